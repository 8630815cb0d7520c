mod poll;
mod vote;

pub use poll::{PollCommands, PollCreateArgs};
pub use vote::VoteCommands;
