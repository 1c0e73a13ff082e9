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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::drill::state::ServerState;
use crate::parser::parse_deck;
use crate::session::Phase;

pub const SAMPLE_DECK: &str = include_str!("sample.json");

/// The events the view can raise. Buttons post their label as the value;
/// `FlipComplete` is posted by script.js when the flip-to-front animation
/// ends.
#[derive(Debug, Deserialize)]
enum Action {
    Start,
    #[serde(rename = "Load Sample")]
    LoadSample,
    Flip,
    Correct,
    Incorrect,
    FlipComplete,
    Reset,
    #[serde(rename = "New Deck")]
    NewDeck,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    #[serde(default)]
    deck: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    let mut mutable = state.mutable.lock().unwrap();
    match form.action {
        Action::Start => match parse_deck(&form.deck) {
            Ok(cards) => {
                mutable.session.start(cards);
                mutable.draft.clear();
                mutable.deck_error = None;
            }
            Err(e) => {
                log::debug!("Rejected deck: {e}");
                mutable.draft = form.deck;
                mutable.deck_error = Some(e.to_string());
            }
        },
        Action::LoadSample => {
            mutable.draft = SAMPLE_DECK.trim_end().to_string();
            mutable.deck_error = None;
        }
        Action::Flip => {
            if mutable.session.phase() != Phase::Studying {
                log::error!("Flipping a card outside a study round.");
            } else if mutable.session.is_flipped() || mutable.session.is_transitioning() {
                log::error!("Flipping a card that is already flipped.");
            } else {
                mutable.session.flip();
            }
        }
        action @ (Action::Correct | Action::Incorrect) => {
            if !mutable.session.is_flipped() {
                log::error!("Marking a card that is not flipped.");
            } else {
                mutable.session.mark(matches!(action, Action::Correct));
            }
        }
        Action::FlipComplete => {
            // Duplicate completion signals land here with no payload
            // pending and fall through as no-ops.
            mutable.session.flip_complete();
        }
        Action::Reset => {
            mutable.session.reset();
        }
        Action::NewDeck => {
            mutable.session.new_deck();
            mutable.draft.clear();
            mutable.deck_error = None;
        }
    }
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_deck_is_valid() {
        let cards = parse_deck(SAMPLE_DECK).unwrap();
        assert!(!cards.is_empty());
    }
}
