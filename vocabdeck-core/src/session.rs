use crate::{apply_outcome, Card, CardId, Outcome};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Complete,
}

/// One pass over the cards currently due.
///
/// The working list is derived, re-creatable state: every review hands the
/// updated card back to the caller for committing to the store, so the
/// engine never becomes a second source of truth for scheduling fields.
/// An incorrectly answered card is requeued at the end of the list and stays
/// in the session until it is answered correctly once.
#[derive(Debug)]
pub struct Session {
    working: Vec<Card>,
    cursor: usize,
    flipped: bool,
    // Sorted snapshot of the card ids the session expects to be due in the
    // store. Reviewing a card removes it here (a committed review always
    // reschedules past today), so `resync` only rebuilds on external change.
    expected_due: Vec<CardId>,
}

fn sorted_ids(cards: &[Card]) -> Vec<CardId> {
    let mut ids: Vec<CardId> = cards.iter().map(|c| c.id).collect();
    ids.sort();
    ids
}

impl Session {
    /// Shuffle the due set into a working list. An empty due set yields a
    /// session that is immediately `Complete`.
    pub fn start(due: &[Card], rng: &mut impl Rng) -> Self {
        let mut working = due.to_vec();
        working.shuffle(rng);
        Self {
            working,
            cursor: 0,
            flipped: false,
            expected_due: sorted_ids(due),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.working.is_empty() {
            SessionState::Complete
        } else {
            SessionState::InProgress
        }
    }

    /// The card at the cursor, presented front (unflipped) first.
    pub fn current(&self) -> Option<&Card> {
        self.working.get(self.cursor)
    }

    pub fn remaining(&self) -> usize {
        self.working.len()
    }

    /// Client-visible flip flag; no scheduling effect.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Review the current card. Returns the rescheduled card for the caller
    /// to commit to the store, or `None` when the session is `Complete`.
    pub fn review(&mut self, outcome: Outcome, today: NaiveDate) -> Option<Card> {
        if self.working.is_empty() {
            return None;
        }
        let card = self.working.remove(self.cursor);
        if let Ok(pos) = self.expected_due.binary_search(&card.id) {
            self.expected_due.remove(pos);
        }

        let updated = apply_outcome(card, outcome.clone(), today);
        if outcome == Outcome::Incorrect {
            self.working.push(updated.clone());
        }

        if self.working.is_empty() {
            self.cursor = 0;
        } else {
            // An item was removed at the cursor, so wrapping the same index
            // lands on the next card in rotation.
            self.cursor %= self.working.len();
        }
        self.flipped = false;
        Some(updated)
    }

    /// Rebuild the session if the store's due set no longer matches what the
    /// session expects (cards added, removed, or rescheduled externally).
    /// Returns whether a rebuild happened. This discards in-progress shuffle
    /// order, trading session continuity for consistency with the store.
    pub fn resync(&mut self, due: &[Card], rng: &mut impl Rng) -> bool {
        if sorted_ids(due) == self.expected_due {
            return false;
        }
        *self = Session::start(due, rng);
        true
    }
}
