//! Reconnecting relay core.
//!
//! A [`RelaySession`] drains events from an [`EventSource`] one at a time and
//! hands each message to a [`Relay`], which routes, rewrites, brands and posts
//! it to a webhook. The [`Supervisor`] rebuilds the session after every
//! failure with a fixed delay, forever.

pub mod error;
pub mod message;
pub mod payload;
pub mod relay;
pub mod session;
pub mod supervisor;
pub mod webhook;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_support;

pub use {
    error::{Error, Result},
    message::{EMBED_LIMIT, IncomingMessage, OutboundPayload},
    relay::{Outcome, Relay, RelayContext},
    session::{EventSource, RelaySession, SessionState, SourceEvent},
    supervisor::{SessionFactory, Supervisor},
    webhook::{Delivery, WebhookClient},
};
