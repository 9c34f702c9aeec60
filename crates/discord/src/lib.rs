//! Discord gateway event source for the relay, built on serenity.
//!
//! The serenity event handler pushes raw events into a bounded channel; the
//! [`DiscordSource`] drains and converts them on the session's side.

pub mod convert;
pub mod factory;
pub mod handler;
pub mod source;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_support;

pub use {factory::DiscordSessionFactory, handler::RelayHandler, source::DiscordSource};
