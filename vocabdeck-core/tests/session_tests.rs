use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocabdeck_core::{Card, Outcome, Session, SessionState};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn cards(n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("word{i}"), format!("meaning{i}")))
        .collect()
}

#[test]
fn empty_due_set_is_complete_immediately() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut s = Session::start(&[], &mut rng);

    assert_eq!(s.state(), SessionState::Complete);
    assert!(s.current().is_none());
    assert_eq!(s.remaining(), 0);
    assert!(s.review(Outcome::Correct, today()).is_none());
}

#[test]
fn single_card_incorrect_requeues_instead_of_completing() {
    let mut rng = StdRng::seed_from_u64(1);
    let due = cards(1);
    let mut s = Session::start(&due, &mut rng);

    let updated = s.review(Outcome::Incorrect, today()).unwrap();

    assert_eq!(s.state(), SessionState::InProgress);
    assert_eq!(s.remaining(), 1);
    assert_eq!(s.current().unwrap().id, due[0].id);
    // The committed copy was reset by the scheduler.
    assert_eq!(updated.strength, 0);
    assert_eq!(updated.interval_days, 1);
}

#[test]
fn two_cards_correct_twice_completes() {
    let mut rng = StdRng::seed_from_u64(7);
    let due = cards(2);
    let mut s = Session::start(&due, &mut rng);

    assert!(s.review(Outcome::Correct, today()).is_some());
    assert_eq!(s.state(), SessionState::InProgress);
    assert!(s.review(Outcome::Correct, today()).is_some());
    assert_eq!(s.state(), SessionState::Complete);
    assert!(s.current().is_none());
}

#[test]
fn card_stays_until_answered_correctly() {
    let mut rng = StdRng::seed_from_u64(3);
    let due = cards(3);
    let mut s = Session::start(&due, &mut rng);
    let target = s.current().unwrap().id;

    // Fail the same card several times; it must never leave the list.
    for _ in 0..4 {
        s.review(Outcome::Incorrect, today());
        assert!(s.remaining() >= 3 || s.state() == SessionState::InProgress);
        // Rotate until the target is at the cursor again.
        while s.current().unwrap().id != target {
            s.review(Outcome::Correct, today());
        }
    }
    assert_eq!(s.current().unwrap().id, target);

    s.review(Outcome::Correct, today());
    assert_eq!(s.state(), SessionState::Complete);
}

#[test]
fn cursor_wraps_to_next_card_in_rotation() {
    let mut rng = StdRng::seed_from_u64(11);
    let due = cards(3);
    let mut s = Session::start(&due, &mut rng);

    let first = s.current().unwrap().id;
    s.review(Outcome::Incorrect, today());
    // The failed card moved to the end; the cursor now shows a different one.
    assert_ne!(s.current().unwrap().id, first);
    assert_eq!(s.remaining(), 3);
}

#[test]
fn review_clears_flip_flag() {
    let mut rng = StdRng::seed_from_u64(5);
    let due = cards(2);
    let mut s = Session::start(&due, &mut rng);

    s.flip();
    assert!(s.is_flipped());
    s.review(Outcome::Correct, today());
    assert!(!s.is_flipped());

    // Flipping has no scheduling effect.
    s.flip();
    s.flip();
    assert_eq!(s.remaining(), 1);
}

#[test]
fn seeded_sessions_shuffle_identically() {
    let due = cards(6);
    let mut a = Session::start(&due, &mut StdRng::seed_from_u64(42));
    let mut b = Session::start(&due, &mut StdRng::seed_from_u64(42));

    while a.state() == SessionState::InProgress {
        assert_eq!(a.current().unwrap().id, b.current().unwrap().id);
        a.review(Outcome::Correct, today());
        b.review(Outcome::Correct, today());
    }
    assert_eq!(b.state(), SessionState::Complete);
}

#[test]
fn resync_ignores_sessions_own_reviews() {
    let mut rng = StdRng::seed_from_u64(9);
    let due = cards(3);
    let mut s = Session::start(&due, &mut rng);

    let first = s.current().unwrap().id;
    s.review(Outcome::Incorrect, today());

    // Committing the review removes the card from the store's due set, but
    // the session still expects exactly the remainder; no rebuild.
    let store_due: Vec<Card> = due.iter().filter(|c| c.id != first).cloned().collect();
    assert!(!s.resync(&store_due, &mut rng));
    assert_eq!(s.remaining(), 3);
}

#[test]
fn resync_rebuilds_on_external_change() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut due = cards(2);
    let mut s = Session::start(&due, &mut rng);

    // A card created elsewhere becomes due.
    due.push(Card::new("nonce", "for the time being"));
    assert!(s.resync(&due, &mut rng));
    assert_eq!(s.remaining(), 3);
    assert_eq!(s.state(), SessionState::InProgress);

    // A card deleted elsewhere disappears from the session too.
    due.clear();
    assert!(s.resync(&due, &mut rng));
    assert_eq!(s.state(), SessionState::Complete);
}
