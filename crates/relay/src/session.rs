use std::collections::VecDeque;

use {
    async_trait::async_trait,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{Result, message::IncomingMessage, relay::Relay};

/// Messages held while waiting for `Ready`; the oldest go first on overflow.
const PENDING_LIMIT: usize = 256;

/// Events surfaced by a connected event source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// The connection is authenticated and receiving events.
    Ready { user: String, guilds: usize },
    Message(IncomingMessage),
}

/// A push-based event source (the Discord gateway in production).
///
/// An `Err` from [`EventSource::connect`] or [`EventSource::next_event`] is a
/// connection-level failure: the session ends and the supervisor rebuilds it.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn connect(&mut self) -> Result<()>;

    /// Wait for the next event, in arrival order.
    async fn next_event(&mut self) -> Result<SourceEvent>;

    /// Shut the connection down and release its resources.
    async fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

/// One connection lifetime: connect, relay events sequentially, tear down.
pub struct RelaySession {
    source: Box<dyn EventSource>,
    relay: Option<Relay>,
    state: SessionState,
    pending: VecDeque<IncomingMessage>,
}

impl RelaySession {
    pub fn new(source: Box<dyn EventSource>, relay: Relay) -> Self {
        Self {
            source,
            relay: Some(relay),
            state: SessionState::Connecting,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until the source fails or `cancel` fires.
    ///
    /// Always ends `Closed`, whatever the outcome. Returns `Ok` only when
    /// cancelled.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<()> {
        let result = self.drive(cancel).await;
        self.shutdown().await;
        result
    }

    async fn drive(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.transition(SessionState::Connecting);
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            connected = self.source.connect() => connected?,
        }

        loop {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(()),
                event = self.source.next_event() => event?,
            };

            match event {
                SourceEvent::Ready { user, guilds } => {
                    self.transition(SessionState::Active);
                    let channels = self.relay.as_ref().map_or(0, Relay::channel_count);
                    info!(
                        %user,
                        guilds,
                        channels,
                        pending = self.pending.len(),
                        "relay session ready"
                    );
                    while let Some(message) = self.pending.pop_front() {
                        self.forward(message).await;
                    }
                },
                SourceEvent::Message(message) if self.state != SessionState::Active => {
                    if self.pending.len() == PENDING_LIMIT {
                        self.pending.pop_front();
                        warn!(
                            limit = PENDING_LIMIT,
                            "pre-ready buffer full, oldest message dropped"
                        );
                    }
                    debug!(channel_id = message.channel_id, "message before ready, held");
                    self.pending.push_back(message);
                },
                SourceEvent::Message(message) => self.forward(message).await,
            }
        }
    }

    async fn forward(&self, message: IncomingMessage) {
        if let Some(relay) = &self.relay {
            relay.relay(message).await;
        }
    }

    async fn shutdown(&mut self) {
        self.transition(SessionState::Closing);
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "discarding messages held before ready");
            self.pending.clear();
        }
        // Release the webhook client before the connection goes away.
        drop(self.relay.take());
        self.source.close().await;
        self.transition(SessionState::Closed);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "relay session state");
            self.state = next;
        }
    }
}
