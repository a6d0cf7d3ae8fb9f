use chrono::NaiveDate;
use vocabdeck_core::{apply_outcome, Card, Outcome, INTERVAL_TABLE};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn incorrect_resets_regardless_of_prior_state() {
    let today = day(2024, 3, 10);
    let mut card = Card::new("ephemeral", "lasting a very short time");
    card.strength = 4;
    card.interval_days = 35;

    let c = apply_outcome(card, Outcome::Incorrect, today);

    assert_eq!(c.strength, 0);
    assert_eq!(c.interval_days, 1);
    assert_eq!(c.next_review_at.date_naive(), day(2024, 3, 11));
}

#[test]
fn correct_walks_the_interval_table() {
    let today = day(2024, 3, 10);
    let mut card = Card::new("ubiquitous", "present everywhere");

    // strength' = 1..=5 maps to table entries 3, 7, 16, 35, 90
    let expected = [3u32, 7, 16, 35, 90];
    for want in expected {
        card = apply_outcome(card, Outcome::Correct, today);
        assert_eq!(card.interval_days, want);
    }
}

#[test]
fn interval_saturates_at_table_max() {
    let today = day(2024, 3, 10);
    let mut card = Card::new("serendipity", "a happy accident");
    for _ in 0..20 {
        let prev = card.interval_days;
        card = apply_outcome(card, Outcome::Correct, today);
        assert!(card.interval_days >= prev);
    }
    assert_eq!(card.interval_days, *INTERVAL_TABLE.last().unwrap());
    assert_eq!(card.next_review_at.date_naive(), day(2024, 3, 10) + chrono::Days::new(90));
}

#[test]
fn strength_two_correct_jumps_to_sixteen_days() {
    let today = day(2024, 6, 1);
    let mut card = Card::new("laconic", "using few words");
    card.strength = 2;
    card.interval_days = 3;

    let c = apply_outcome(card, Outcome::Correct, today);

    assert_eq!(c.strength, 3);
    assert_eq!(c.interval_days, 16);
    assert_eq!(c.next_review_at.date_naive(), day(2024, 6, 17));
}

#[test]
fn result_is_day_granular() {
    let today = day(2024, 3, 10);
    let card = Card::new("diurnal", "of the daytime");

    let a = apply_outcome(card.clone(), Outcome::Correct, today);
    let b = apply_outcome(card, Outcome::Correct, today);

    // Same calendar day in, identical schedule out.
    assert_eq!(a.next_review_at, b.next_review_at);
    assert_eq!(a.next_review_at, a.next_review_at.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc());
}

#[test]
fn scheduler_never_touches_payload() {
    let today = day(2024, 3, 10);
    let mut card = Card::new("petrichor", "smell of rain on dry earth");
    card.ai_explanation = Some("think wet pavement".into());
    card.image_ref = Some("data:image/jpeg;base64,abc".into());

    let c = apply_outcome(card, Outcome::Correct, today);

    assert_eq!(c.ai_explanation.as_deref(), Some("think wet pavement"));
    assert_eq!(c.image_ref.as_deref(), Some("data:image/jpeg;base64,abc"));
}
