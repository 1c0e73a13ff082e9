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

use std::fmt::Display;
use std::fmt::Formatter;

use serde_json::Value;

use crate::types::card::Card;

/// Why a submitted deck was rejected. The Display impls are shown to the
/// user verbatim on the input screen.
#[derive(Debug, PartialEq, Eq)]
pub enum DeckError {
    /// The text is not valid JSON. Carries the underlying parse message.
    NotJson(String),
    /// The top-level value is not an array.
    NotArray,
    /// The array has no elements.
    EmptyArray,
    /// The item at this (zero-based) index has a missing, non-string, or
    /// empty `front` or `back`.
    MissingField(usize),
}

impl Display for DeckError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            DeckError::NotJson(message) => write!(f, "Invalid JSON: {message}"),
            DeckError::NotArray => write!(f, "JSON must be an array"),
            DeckError::EmptyArray => write!(f, "Array must not be empty"),
            DeckError::MissingField(index) => {
                write!(f, "Item {} is missing \"front\" or \"back\" key", index + 1)
            }
        }
    }
}

impl std::error::Error for DeckError {}

/// Parses a JSON array of `{front, back}` objects into cards.
///
/// Every element must carry both keys as non-empty strings. Sessions are
/// started only with the output of this function, so the session itself
/// never sees an empty deck or an empty card side.
pub fn parse_deck(text: &str) -> Result<Vec<Card>, DeckError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DeckError::NotJson(e.to_string()))?;
    let items = match value.as_array() {
        Some(items) => items,
        None => return Err(DeckError::NotArray),
    };
    if items.is_empty() {
        return Err(DeckError::EmptyArray);
    }
    let mut cards = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match (field(item, "front"), field(item, "back")) {
            (Some(front), Some(back)) => cards.push(Card::new(front, back)),
            _ => return Err(DeckError::MissingField(index)),
        }
    }
    Ok(cards)
}

fn field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
