pub mod countdown;
pub mod dispatch;
pub mod poll;
pub mod results;
pub mod shared;
pub mod sweep;
pub mod vote;
