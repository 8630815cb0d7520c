use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PollStatus;

/// A question with an immutable ordered set of options and a bounded
/// activation window. The `id` doubles as the public poll code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Poll {
    #[must_use]
    pub const fn status(&self) -> PollStatus {
        PollStatus::from_active(self.is_active)
    }

    /// Whether the activation window has passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Active in storage and still inside its window.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    #[must_use]
    pub fn has_option(&self, choice: &str) -> bool {
        self.options.iter().any(|option| option == choice)
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }
}

/// What a joining client needs to branch between "go vote" and
/// "show final results".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PollSummary {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
}
