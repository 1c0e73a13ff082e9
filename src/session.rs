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

use std::collections::HashSet;

use crate::shuffle::shuffle;
use crate::types::card::Card;
use crate::types::card_hash::CardHash;

/// The coarse state of a study session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Waiting for a deck.
    Input,
    /// Drilling through a round.
    Studying,
    /// Every card survived a round with zero misses.
    Complete,
}

/// The set of cards marked incorrect during one round. A fresh queue is
/// constructed for every round, so nothing can bleed across rounds.
pub struct RoundQueue {
    misses: HashSet<CardHash>,
}

impl RoundQueue {
    pub fn new() -> Self {
        Self {
            misses: HashSet::new(),
        }
    }

    /// Records a miss. Marking the same card twice is the same as once.
    pub fn record_incorrect(&mut self, card: &Card) {
        self.misses.insert(card.hash());
    }

    /// True iff no card has been marked incorrect this round.
    pub fn is_empty(&self) -> bool {
        self.misses.is_empty()
    }

    /// Consumes the queue. Callers replace it with a fresh instance.
    pub fn drain(self) -> HashSet<CardHash> {
        self.misses
    }
}

/// The study session state machine.
///
/// Owns the deck, the current round, and the card position; nothing else
/// mutates them. All mutation happens synchronously inside the event
/// handlers below. The one asynchronous boundary is between `mark` and
/// `flip_complete`, while the view plays the flip-to-front animation; the
/// payload captured in `pending` bridges that gap, and the gap may be
/// arbitrarily long.
pub struct Session {
    /// The full deck, fixed at `start`. Kept so `reset` can reshuffle it
    /// without re-importing.
    deck: Vec<Card>,
    /// The cards being drilled, in drill order.
    round: Vec<Card>,
    index: usize,
    flipped: bool,
    /// The payload captured by `mark` and consumed by `flip_complete`. A
    /// transition is in progress exactly while this is `Some`.
    pending: Option<bool>,
    misses: RoundQueue,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self {
            deck: Vec::new(),
            round: Vec::new(),
            index: 0,
            flipped: false,
            pending: None,
            misses: RoundQueue::new(),
            phase: Phase::Input,
        }
    }

    pub fn with_deck(cards: Vec<Card>) -> Self {
        let mut session = Self::new();
        session.start(cards);
        session
    }

    /// Starts (or restarts) studying with the given deck. The caller
    /// guarantees the deck is non-empty and validated.
    pub fn start(&mut self, cards: Vec<Card>) {
        debug_assert!(!cards.is_empty());
        self.round = shuffle(&cards);
        self.deck = cards;
        self.index = 0;
        self.flipped = false;
        self.pending = None;
        self.misses = RoundQueue::new();
        self.phase = Phase::Studying;
        log::debug!("Session started with {} cards", self.deck.len());
    }

    /// Turns the current card over to show its back. Ignored when there
    /// is no front-facing card to turn, including while a transition is
    /// in progress.
    pub fn flip(&mut self) {
        if self.phase != Phase::Studying || self.flipped || self.pending.is_some() {
            return;
        }
        self.flipped = true;
    }

    /// Records the verdict on the current card and begins the
    /// flip-to-front transition. The logical advance is deferred until
    /// the view reports the animation finished (`flip_complete`).
    pub fn mark(&mut self, correct: bool) {
        if self.phase != Phase::Studying || !self.flipped || self.pending.is_some() {
            return;
        }
        let card = &self.round[self.index];
        log::debug!(
            "{} {}",
            &card.hash().to_hex()[..8],
            if correct { "correct" } else { "incorrect" }
        );
        if !correct {
            self.misses.record_incorrect(card);
        }
        self.pending = Some(correct);
        self.flipped = false;
    }

    /// Consumes the pending mark payload and advances: next card, next
    /// round, or completion. With no payload pending this is a no-op, so
    /// duplicate or spurious animation-completion signals are harmless.
    pub fn flip_complete(&mut self) {
        if self.pending.take().is_none() {
            return;
        }
        if self.index + 1 < self.round.len() {
            self.index += 1;
            return;
        }
        // End of round: requeue the misses or finish. `mark` records
        // misses eagerly, so the queue already includes the last card.
        let misses = std::mem::replace(&mut self.misses, RoundQueue::new()).drain();
        if misses.is_empty() {
            log::debug!("Session completed");
            self.phase = Phase::Complete;
        } else {
            let missed: Vec<Card> = self
                .round
                .iter()
                .filter(|card| misses.contains(&card.hash()))
                .cloned()
                .collect();
            log::debug!("Starting a new round with {} cards", missed.len());
            self.round = shuffle(&missed);
            self.index = 0;
        }
    }

    /// Reshuffles the full deck into a fresh first round. A pending
    /// transition payload is discarded.
    pub fn reset(&mut self) {
        if self.deck.is_empty() {
            log::error!("Resetting a session that has no deck.");
            return;
        }
        let deck = self.deck.clone();
        self.start(deck);
    }

    /// Discards all session state and returns to the input screen.
    pub fn new_deck(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The card being drilled. `None` outside the `Studying` phase.
    pub fn current_card(&self) -> Option<&Card> {
        if self.phase == Phase::Studying {
            self.round.get(self.index)
        } else {
            None
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// True between `mark` and the matching `flip_complete`.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn round_len(&self) -> usize {
        self.round.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(fronts: &[&str]) -> Vec<Card> {
        fronts
            .iter()
            .map(|front| Card::new(*front, format!("back of {front}")))
            .collect()
    }

    /// Flips and marks the current card, then completes the transition.
    fn drill_card(session: &mut Session, correct: bool) {
        session.flip();
        assert!(session.is_flipped());
        session.mark(correct);
        assert!(session.is_transitioning());
        assert!(!session.is_flipped());
        session.flip_complete();
        assert!(!session.is_transitioning());
    }

    #[test]
    fn test_round_queue_is_idempotent() {
        let card = Card::new("Q", "A");
        let mut queue = RoundQueue::new();
        assert!(queue.is_empty());
        queue.record_incorrect(&card);
        queue.record_incorrect(&card);
        assert!(!queue.is_empty());
        assert_eq!(queue.drain().len(), 1);
    }

    #[test]
    fn test_round_queue_keys_on_content() {
        // A clone and an independently constructed equal card are the
        // same member.
        let card = Card::new("Q", "A");
        let mut queue = RoundQueue::new();
        queue.record_incorrect(&card.clone());
        let misses = queue.drain();
        assert!(misses.contains(&Card::new("Q", "A").hash()));
        assert_eq!(misses.len(), 1);
    }

    #[test]
    fn test_start_enters_studying() {
        let session = Session::with_deck(deck(&["Q1", "Q2", "Q3"]));
        assert_eq!(session.phase(), Phase::Studying);
        assert_eq!(session.round_len(), 3);
        assert_eq!(session.index(), 0);
        assert!(!session.is_flipped());
        assert!(!session.is_transitioning());
        assert!(session.current_card().is_some());
    }

    #[test]
    fn test_round_is_a_permutation_of_the_deck() {
        let cards = deck(&["Q1", "Q2", "Q3", "Q4", "Q5"]);
        let mut expected: Vec<CardHash> = cards.iter().map(Card::hash).collect();
        expected.sort();
        let mut session = Session::with_deck(cards);
        let mut round: Vec<CardHash> = Vec::new();
        for _ in 0..session.round_len() {
            round.push(session.current_card().unwrap().hash());
            drill_card(&mut session, true);
        }
        round.sort();
        assert_eq!(round, expected);
    }

    #[test]
    fn test_all_correct_completes_after_one_round() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2", "Q3"]));
        for i in 0..3 {
            assert_eq!(session.index(), i);
            drill_card(&mut session, true);
        }
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_retry_convergence() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        // Round 1: Q1 wrong, Q2 right, whatever order they come up in.
        for _ in 0..2 {
            let correct = session.current_card().unwrap().front() != "Q1";
            drill_card(&mut session, correct);
        }
        assert_eq!(session.phase(), Phase::Studying);
        assert_eq!(session.round_len(), 1);
        assert_eq!(session.current_card().unwrap().front(), "Q1");
        // Round 2: Q1 right.
        drill_card(&mut session, true);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_all_incorrect_repeats_the_full_round() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2", "Q3"]));
        for _ in 0..3 {
            drill_card(&mut session, false);
        }
        assert_eq!(session.phase(), Phase::Studying);
        assert_eq!(session.round_len(), 3);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_single_card_loops_until_correct() {
        let mut session = Session::with_deck(deck(&["Q1"]));
        for _ in 0..5 {
            drill_card(&mut session, false);
            assert_eq!(session.phase(), Phase::Studying);
            assert_eq!(session.round_len(), 1);
        }
        drill_card(&mut session, true);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_duplicate_flip_complete_is_ignored() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        drill_card(&mut session, true);
        assert_eq!(session.index(), 1);
        session.flip_complete();
        session.flip_complete();
        assert_eq!(session.index(), 1);
        assert_eq!(session.phase(), Phase::Studying);
        assert!(!session.is_transitioning());
    }

    #[test]
    fn test_flip_complete_before_any_mark_is_ignored() {
        let mut session = Session::with_deck(deck(&["Q1"]));
        session.flip_complete();
        assert_eq!(session.index(), 0);
        assert_eq!(session.phase(), Phase::Studying);
    }

    #[test]
    fn test_flip_is_gated_during_transition() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        session.flip();
        session.mark(true);
        session.flip();
        assert!(!session.is_flipped());
        assert!(session.is_transitioning());
        // And marking again has no effect either.
        session.mark(false);
        session.flip_complete();
        session.flip_complete();
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn test_mark_requires_a_flipped_card() {
        let mut session = Session::with_deck(deck(&["Q1"]));
        session.mark(true);
        assert!(!session.is_transitioning());
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_flip_when_already_flipped_is_a_noop() {
        let mut session = Session::with_deck(deck(&["Q1"]));
        session.flip();
        session.flip();
        assert!(session.is_flipped());
        session.mark(true);
        session.flip_complete();
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn test_reset_reshuffles_the_full_deck() {
        let cards = deck(&["Q1", "Q2", "Q3"]);
        let mut expected: Vec<CardHash> = cards.iter().map(Card::hash).collect();
        expected.sort();
        let mut session = Session::with_deck(cards);
        for _ in 0..3 {
            drill_card(&mut session, true);
        }
        assert_eq!(session.phase(), Phase::Complete);
        session.reset();
        assert_eq!(session.phase(), Phase::Studying);
        assert_eq!(session.round_len(), 3);
        assert_eq!(session.index(), 0);
        let mut round: Vec<CardHash> = Vec::new();
        for _ in 0..3 {
            round.push(session.current_card().unwrap().hash());
            drill_card(&mut session, true);
        }
        round.sort();
        assert_eq!(round, expected);
    }

    #[test]
    fn test_reset_discards_a_pending_transition() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        session.flip();
        session.mark(false);
        session.reset();
        assert!(!session.is_transitioning());
        assert_eq!(session.index(), 0);
        assert_eq!(session.round_len(), 2);
        // The stale payload must not advance the fresh round.
        session.flip_complete();
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_reset_without_a_deck_is_ignored() {
        let mut session = Session::new();
        session.reset();
        assert_eq!(session.phase(), Phase::Input);
    }

    #[test]
    fn test_new_deck_clears_everything() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        session.flip();
        session.mark(false);
        session.new_deck();
        assert_eq!(session.phase(), Phase::Input);
        assert_eq!(session.round_len(), 0);
        assert!(session.current_card().is_none());
        assert!(!session.is_transitioning());
        // The deck is gone too, so reset has nothing to reshuffle.
        session.reset();
        assert_eq!(session.phase(), Phase::Input);
    }

    #[test]
    fn test_start_replaces_a_running_session() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2"]));
        session.flip();
        session.mark(false);
        session.start(deck(&["Q3"]));
        assert_eq!(session.phase(), Phase::Studying);
        assert_eq!(session.round_len(), 1);
        assert_eq!(session.current_card().unwrap().front(), "Q3");
        assert!(!session.is_transitioning());
    }

    #[test]
    fn test_index_stays_in_bounds() {
        let mut session = Session::with_deck(deck(&["Q1", "Q2", "Q3", "Q4"]));
        let mut steps = 0;
        while session.phase() == Phase::Studying && steps < 64 {
            assert!(session.index() < session.round_len());
            // Miss every other card until they run out.
            drill_card(&mut session, steps % 2 == 0);
            steps += 1;
        }
        assert_eq!(session.phase(), Phase::Complete);
    }
}
