//! Poll creation input validation.
//!
//! Raw form input is normalized here before anything touches the store:
//! whitespace is trimmed, blank options are dropped, repeated options are
//! collapsed to their first occurrence.

use serde::{Deserialize, Serialize};

use crate::errors::PollError;

/// Shortest allowed activation window.
pub const MIN_DURATION_SECS: u32 = 10;
/// Longest allowed activation window (one hour).
pub const MAX_DURATION_SECS: u32 = 3600;
/// Minimum number of distinct, non-empty options.
pub const MIN_OPTIONS: usize = 2;

/// Poll creation request as entered by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
    pub duration_secs: u32,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPoll {
    pub question: String,
    pub options: Vec<String>,
    pub duration_secs: u32,
}

impl NewPoll {
    pub fn new<I, S>(question: impl Into<String>, options: I, duration_secs: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            duration_secs,
        }
    }

    /// Normalize and check the request.
    ///
    /// # Errors
    ///
    /// Returns `PollError::Validation` if the question is blank, fewer than
    /// two distinct non-empty options remain, or the duration is outside
    /// `[MIN_DURATION_SECS, MAX_DURATION_SECS]`.
    pub fn validate(&self) -> Result<ValidatedPoll, PollError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(PollError::Validation("Please enter a question".into()));
        }

        let options = normalize_options(&self.options);
        if options.len() < MIN_OPTIONS {
            return Err(PollError::Validation(
                "Please enter at least two options".into(),
            ));
        }

        validate_duration(self.duration_secs)?;

        Ok(ValidatedPoll {
            question: question.to_string(),
            options,
            duration_secs: self.duration_secs,
        })
    }
}

/// Check a poll duration against the allowed window.
///
/// # Errors
///
/// Returns `PollError::Validation` when `secs` is out of range.
pub fn validate_duration(secs: u32) -> Result<(), PollError> {
    if (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(PollError::Validation(format!(
            "Duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds, got {secs}"
        )))
    }
}

fn normalize_options(raw: &[String]) -> Vec<String> {
    let mut options: Vec<String> = Vec::with_capacity(raw.len());
    for option in raw.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
        if !options.iter().any(|existing| existing == option) {
            options.push(option.to_string());
        }
    }
    options
}
