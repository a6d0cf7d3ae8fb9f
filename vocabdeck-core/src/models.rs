use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = Uuid;
pub type FolderId = Uuid;

/// Review spacing in days, indexed by strength (saturating at the last entry).
pub const INTERVAL_TABLE: [u32; 6] = [1, 3, 7, 16, 35, 90];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub word: String,
    pub meaning: String,
    pub folder_id: Option<FolderId>,

    // Opaque payload; the scheduler never reads or writes these.
    pub image_ref: Option<String>,
    pub ai_explanation: Option<String>,
    pub explanation: Option<String>,

    pub strength: u32,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl Card {
    /// A fresh card is immediately due: strength 0, one-day interval,
    /// next review at creation time.
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            word: word.into(),
            meaning: meaning.into(),
            folder_id: None,
            image_ref: None,
            ai_explanation: None,
            explanation: None,
            strength: 0,
            interval_days: 1,
            next_review_at: now,
            created_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.strength == 0
    }

    /// Due comparison is at day granularity; time-of-day is ignored.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.date_naive() <= now.date_naive()
    }
}
