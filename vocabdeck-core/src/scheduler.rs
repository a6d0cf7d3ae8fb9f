use crate::{Card, Outcome, INTERVAL_TABLE};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Apply a review outcome to a card's scheduling fields.
///
/// Pure and total: given the same card, outcome, and `today`, the result is
/// identical no matter the time of day. The caller commits the returned card
/// back to the store; nothing else may touch the scheduling fields.
///
/// The interval table is a fixed ladder that saturates at 90 days. This is a
/// deliberately simplified model, not SM-2: no ease factor, no decay.
pub fn apply_outcome(mut card: Card, outcome: Outcome, today: NaiveDate) -> Card {
    match outcome {
        Outcome::Incorrect => {
            card.strength = 0;
            card.interval_days = 1;
            card.next_review_at = midnight(today + Days::new(1));
        }
        Outcome::Correct => {
            card.strength += 1;
            let idx = (card.strength as usize).min(INTERVAL_TABLE.len() - 1);
            card.interval_days = INTERVAL_TABLE[idx];
            card.next_review_at = midnight(today + Days::new(card.interval_days as u64));
        }
    }
    card
}

/// `apply_outcome` anchored at the current calendar day.
pub fn apply_outcome_now(card: Card, outcome: Outcome) -> Card {
    apply_outcome(card, outcome, Utc::now().date_naive())
}
