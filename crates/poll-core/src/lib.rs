//! # poll-core
//!
//! Core types, validation, and error types for Livepoll.
//!
//! This crate provides the foundational types shared across all Livepoll crates:
//! - Entity structs for polls and votes
//! - Poll status enum with its one-way transition
//! - Document path helpers for the poll/vote layout
//! - Poll creation validation
//! - Vote tally computation and chart series conversion
//! - Countdown formatting
//! - Cross-cutting error types
//! - Notification sink trait
//! - CLI response types

pub mod countdown;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod notify;
pub mod paths;
pub mod responses;
pub mod tally;
pub mod validation;
