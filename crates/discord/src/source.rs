use std::sync::Arc;

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serenity::{Client, gateway::ShardManager},
    tokio::{sync::mpsc, task::JoinHandle},
    tracing::{debug, info, warn},
};

use kyron_relay::{Error, EventSource, Result, SourceEvent};

use crate::{
    convert::to_incoming,
    handler::{GatewayEvent, RelayHandler},
};

/// Bounded so a stalled relay pushes back on the gateway handler.
const EVENT_BUFFER: usize = 256;

/// A Discord gateway connection exposed as a relay [`EventSource`].
///
/// Each instance owns at most one serenity client; build a new one per
/// session.
pub struct DiscordSource {
    token: Secret<String>,
    events: Option<mpsc::Receiver<GatewayEvent>>,
    shard_manager: Option<Arc<ShardManager>>,
    client_task: Option<JoinHandle<()>>,
}

impl DiscordSource {
    pub fn new(token: Secret<String>) -> Self {
        Self {
            token,
            events: None,
            shard_manager: None,
            client_task: None,
        }
    }
}

#[async_trait]
impl EventSource for DiscordSource {
    async fn connect(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let mut client = Client::builder(self.token.expose_secret(), RelayHandler::intents())
            .event_handler(RelayHandler::new(tx.clone()))
            .await
            .map_err(|e| Error::external("failed to build discord client", e))?;

        self.shard_manager = Some(Arc::clone(&client.shard_manager));
        self.events = Some(rx);
        self.client_task = Some(tokio::spawn(async move {
            let reason = match client.start().await {
                Ok(()) => "gateway connection closed".to_string(),
                Err(e) => e.to_string(),
            };
            let _ = tx.send(GatewayEvent::Stopped(reason)).await;
        }));

        info!("connecting to discord gateway");
        Ok(())
    }

    /// Conversion happens here, on the session's single consumer, so it
    /// cannot reorder messages.
    async fn next_event(&mut self) -> Result<SourceEvent> {
        let Some(events) = self.events.as_mut() else {
            return Err(Error::disconnected("not connected"));
        };
        loop {
            match events.recv().await {
                Some(GatewayEvent::Ready { user, guilds }) => {
                    return Ok(SourceEvent::Ready { user, guilds });
                },
                Some(GatewayEvent::Message(msg)) => match to_incoming(&msg) {
                    Ok(incoming) => return Ok(SourceEvent::Message(incoming)),
                    Err(e) => warn!(
                        channel_id = %msg.channel_id,
                        message_id = %msg.id,
                        error = %e,
                        "failed to convert discord message"
                    ),
                },
                Some(GatewayEvent::Stopped(reason)) => return Err(Error::disconnected(reason)),
                None => return Err(Error::disconnected("gateway event channel closed")),
            }
        }
    }

    async fn close(&mut self) {
        if let Some(shard_manager) = self.shard_manager.take() {
            shard_manager.shutdown_all().await;
        }
        if let Some(task) = self.client_task.take() {
            task.abort();
            let _ = task.await;
        }
        self.events = None;
        debug!("discord gateway closed");
    }
}
