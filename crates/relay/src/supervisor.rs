use std::time::Duration;

use {
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use crate::{Result, session::RelaySession};

/// Builds a fresh session (new connection, new webhook client) per attempt.
pub trait SessionFactory: Send + Sync {
    fn build(&self) -> Result<RelaySession>;
}

/// Keeps a relay session running forever, restarting after a fixed delay.
///
/// There is no retry cap and no backoff growth.
pub struct Supervisor<F> {
    factory: F,
    reconnect_delay: Duration,
}

impl<F: SessionFactory> Supervisor<F> {
    pub fn new(factory: F, reconnect_delay: Duration) -> Self {
        Self {
            factory,
            reconnect_delay,
        }
    }

    /// Run sessions back to back until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let result = match self.factory.build() {
                Ok(mut session) => session.run(&cancel).await,
                Err(e) => Err(e),
            };

            if cancel.is_cancelled() {
                info!("relay supervisor stopped");
                return;
            }

            let delay_secs = self.reconnect_delay.as_secs_f64();
            match result {
                Ok(()) => warn!(attempt, delay_secs, "relay session ended, reconnecting"),
                Err(e) => warn!(
                    attempt,
                    delay_secs,
                    error = %e,
                    "relay session failed, reconnecting"
                ),
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    info!("relay supervisor stopped");
                    return;
                },
                () = tokio::time::sleep(self.reconnect_delay) => {},
            }
        }
    }
}
