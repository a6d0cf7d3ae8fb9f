use crate::{Card, FolderId};
use chrono::{DateTime, Utc};

/// Cards due on or before `now`, at day granularity. Idempotent; does not
/// mutate its input.
pub fn filter_due(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    cards.iter().filter(|c| c.is_due(now)).cloned().collect()
}

pub fn filter_by_text(cards: &[Card], query: &str) -> Vec<Card> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return cards.to_vec();
    }
    cards
        .iter()
        .filter(|c| {
            c.word.to_lowercase().contains(&q)
                || c.meaning.to_lowercase().contains(&q)
                || c.ai_explanation
                    .as_ref()
                    .map(|e| e.to_lowercase().contains(&q))
                    .unwrap_or(false)
                || c.explanation
                    .as_ref()
                    .map(|e| e.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// `None` selects unfiled cards.
pub fn filter_by_folder(cards: &[Card], folder_id: Option<FolderId>) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.folder_id == folder_id)
        .cloned()
        .collect()
}
