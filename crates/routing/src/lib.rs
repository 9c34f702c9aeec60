//! Route inbound channel IDs to webhook destinations.
//!
//! Lookup cascade:
//! 1. Exact channel ID match
//! 2. Partial match: first configured ID (declaration order) whose decimal
//!    form contains, or is contained in, the inbound ID
//! 3. No route (message is dropped)

pub mod error;
pub mod resolve;

pub use {
    error::{Error, Result},
    resolve::{ChannelRouter, MatchKind, Route},
};
