//! Document path layout.
//!
//! ```text
//! polls/{poll_id}                    poll document
//! polls/{poll_id}/votes/{voter_id}   one vote document per voter
//! ```

pub const POLLS_COLLECTION: &str = "polls";
pub const VOTES_COLLECTION: &str = "votes";

#[must_use]
pub fn poll_path(poll_id: &str) -> String {
    format!("{POLLS_COLLECTION}/{poll_id}")
}

#[must_use]
pub fn votes_path(poll_id: &str) -> String {
    format!("{POLLS_COLLECTION}/{poll_id}/{VOTES_COLLECTION}")
}

#[must_use]
pub fn vote_path(poll_id: &str, voter_id: &str) -> String {
    format!("{}/{voter_id}", votes_path(poll_id))
}

/// Normalize a user-entered poll code: surrounding whitespace is dropped and
/// letters are upper-cased to match generated ids.
#[must_use]
pub fn normalize_poll_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
