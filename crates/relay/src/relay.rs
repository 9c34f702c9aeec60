use std::sync::Arc;

use {
    kyron_config::BrandingConfig,
    kyron_rewrite::Rewriter,
    kyron_routing::{ChannelRouter, MatchKind},
    tracing::{debug, warn},
};

use crate::{
    message::IncomingMessage,
    payload::build_payload,
    webhook::{Delivery, WebhookClient},
};

/// Read-only state shared by every session for the process lifetime.
#[derive(Debug, Clone)]
pub struct RelayContext {
    pub router: Arc<ChannelRouter>,
    pub rewriter: Arc<Rewriter>,
    pub branding: Arc<BrandingConfig>,
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No configured channel matched.
    Unrouted,
    /// Nothing left to send after rewriting.
    Empty,
    Delivered { status: u16 },
    Rejected { status: u16 },
    /// The request never produced a response.
    Failed,
}

/// Forwards messages for one session.
pub struct Relay {
    ctx: RelayContext,
    webhook: WebhookClient,
}

impl Relay {
    pub fn new(ctx: RelayContext, webhook: WebhookClient) -> Self {
        Self { ctx, webhook }
    }

    pub fn channel_count(&self) -> usize {
        self.ctx.router.len()
    }

    /// Route, rewrite and post one message.
    ///
    /// Failures are logged and reported through the [`Outcome`]; nothing here
    /// ends the session.
    pub async fn relay(&self, message: IncomingMessage) -> Outcome {
        debug!(
            channel_id = message.channel_id,
            author = %message.author_name,
            bot = message.author_is_bot,
            "received message"
        );

        let Some(route) = self.ctx.router.resolve(message.channel_id) else {
            return Outcome::Unrouted;
        };
        if route.kind == MatchKind::Partial {
            debug!(
                channel_id = message.channel_id,
                configured_channel_id = route.channel_id,
                "relaying through partial channel match"
            );
        }

        let channel_id = message.channel_id;
        let Some(payload) = build_payload(
            message,
            route.webhook_url,
            &self.ctx.branding,
            &self.ctx.rewriter,
        ) else {
            debug!(channel_id, "nothing to relay");
            return Outcome::Empty;
        };

        match self.webhook.execute(&payload).await {
            Ok(Delivery::Accepted { status }) => Outcome::Delivered {
                status: status.as_u16(),
            },
            Ok(Delivery::Rejected { status, body }) => {
                warn!(
                    channel_id,
                    status = status.as_u16(),
                    body = %body,
                    "webhook error"
                );
                Outcome::Rejected {
                    status: status.as_u16(),
                }
            },
            Err(e) => {
                warn!(channel_id, error = %e, "error forwarding message");
                Outcome::Failed
            },
        }
    }
}
