//! Repository methods on `PollService`, one module per document kind.

pub mod poll;
pub mod vote;
