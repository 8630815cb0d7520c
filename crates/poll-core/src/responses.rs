//! CLI response types returned as JSON by `pollctl` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::countdown::{COUNTDOWN_ZERO, format_until};
use crate::entities::{Poll, Vote};
use crate::enums::CloseOutcome;
use crate::tally::{ChartSlice, Tally};

/// Response from `pollctl poll create`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PollCreateResponse {
    pub poll: Poll,
    /// Code to share with voters.
    pub poll_code: String,
}

/// Response from `pollctl poll close`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PollCloseResponse {
    pub poll_id: String,
    pub outcome: CloseOutcome,
}

/// Response from `pollctl poll show`, `pollctl poll watch` and `pollctl results`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PollResultsResponse {
    pub poll: Poll,
    pub tally: Tally,
    pub chart: Vec<ChartSlice>,
    pub time_left: String,
}

impl PollResultsResponse {
    /// Build the view as of `now`. A closed poll always shows `00:00`.
    #[must_use]
    pub fn new(poll: Poll, tally: Tally, now: DateTime<Utc>) -> Self {
        let time_left = if poll.is_active {
            format_until(poll.expires_at, now)
        } else {
            COUNTDOWN_ZERO.to_string()
        };
        Self {
            chart: tally.chart(),
            poll,
            tally,
            time_left,
        }
    }
}

/// One line of `pollctl countdown`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CountdownResponse {
    pub poll_id: String,
    pub time_left: String,
}

/// Response from `pollctl vote cast` and `pollctl vote mine`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoteResponse {
    pub poll_id: String,
    pub vote: Option<Vote>,
}

/// Response from `pollctl sweep`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SweepResponse {
    pub closed: Vec<String>,
}
