//! Discord event handler for serenity.
//!
//! Implements the EventHandler trait and forwards ready/message events to the
//! relay session over a channel.

use {
    serenity::{
        all::{Context, EventHandler, GatewayIntents, Message, Ready},
        async_trait,
    },
    tokio::sync::mpsc,
    tracing::{debug, info},
};

/// What the handler and the client task report to [`crate::DiscordSource`].
///
/// Messages travel unconverted: serenity runs each handler call in its own
/// task, so the handler does no work before enqueueing.
#[derive(Debug)]
pub enum GatewayEvent {
    Ready { user: String, guilds: usize },
    Message(Box<Message>),
    /// `Client::start` returned; carries the reason.
    Stopped(String),
}

/// Handler for Discord gateway events.
pub struct RelayHandler {
    events: mpsc::Sender<GatewayEvent>,
}

impl RelayHandler {
    pub fn new(events: mpsc::Sender<GatewayEvent>) -> Self {
        Self { events }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    async fn forward(&self, event: GatewayEvent) {
        if self.events.send(event).await.is_err() {
            debug!("relay session gone, discarding gateway event");
        }
    }
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
        self.forward(GatewayEvent::Ready {
            user: format!("{} ({})", ready.user.name, ready.user.id),
            guilds: ready.guilds.len(),
        })
        .await;
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        self.forward(GatewayEvent::Message(Box::new(msg))).await;
    }
}
