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

use crate::types::card_hash::CardHash;
use crate::types::card_hash::Hasher;

/// A single flashcard. Immutable once constructed; identity for all
/// set-membership purposes is the content hash, never the address of a
/// particular clone.
#[derive(Clone, Debug)]
pub struct Card {
    /// The prompt side.
    front: String,
    /// The answer side.
    back: String,
    /// The cached hash of the card's content.
    hash: CardHash,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        let front = front.into().trim().to_string();
        let back = back.into().trim().to_string();
        let hash = {
            let mut hasher = Hasher::new();
            hasher.update(b"Card");
            hasher.update(front.as_bytes());
            hasher.update(back.as_bytes());
            hasher.finalize()
        };
        Self { front, back, hash }
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn hash(&self) -> CardHash {
        self.hash
    }
}
