// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::drill::server::start_server;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_deck;
use crate::types::card::Card;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill cards in the browser.
    Drill {
        /// Optional path to a JSON deck file. Without one, the session
        /// starts at the paste-a-deck screen.
        file: Option<String>,
        /// Port to serve the drill UI on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Do not open the browser automatically.
        #[arg(long)]
        no_open: bool,
    },
    /// Validate a JSON deck file.
    Check {
        /// Path to a JSON deck file.
        file: String,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            file,
            port,
            no_open,
        } => {
            let deck = match file {
                Some(file) => Some(load_deck(&file)?),
                None => None,
            };
            start_server(deck, port, !no_open).await
        }
        Command::Check { file } => {
            let cards = load_deck(&file)?;
            println!("ok: {} cards.", cards.len());
            Ok(())
        }
    }
}

fn load_deck(file: &str) -> Fallible<Vec<Card>> {
    let path = PathBuf::from(file);
    if !path.exists() {
        return fail("deck file does not exist.");
    }
    let text = std::fs::read_to_string(path)?;
    let cards = parse_deck(&text)?;
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_deck() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"[{{"front": "Q1", "back": "A1"}}]"#)?;
        let cards = load_deck(file.path().to_str().unwrap())?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "Q1");
        Ok(())
    }

    #[test]
    fn test_load_deck_non_existent_file() {
        let result = load_deck("./derpherp.json");
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: deck file does not exist.");
    }

    #[test]
    fn test_load_deck_invalid_contents() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "not json")?;
        assert!(load_deck(file.path().to_str().unwrap()).is_err());
        Ok(())
    }
}
