//! Entity structs for Livepoll domain objects.
//!
//! Each entity maps to a document in the store (see `paths`). All structs
//! derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod poll;
mod vote;

pub use poll::{Poll, PollSummary};
pub use vote::Vote;
