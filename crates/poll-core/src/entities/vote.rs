use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One voter's choice in one poll. Keyed by `(poll_id, voter_id)`; a
/// resubmission overwrites the previous record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: String,
    pub voter_id: String,
    pub choice: String,
    pub voted_at: DateTime<Utc>,
}
