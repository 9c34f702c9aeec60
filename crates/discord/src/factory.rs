use {
    kyron_relay::{Relay, RelayContext, RelaySession, Result, SessionFactory, WebhookClient},
    secrecy::Secret,
};

use crate::source::DiscordSource;

/// Builds one Discord-backed session per supervisor attempt.
///
/// Every session gets a fresh gateway client and a fresh webhook client; only
/// the [`RelayContext`] is shared across attempts.
pub struct DiscordSessionFactory {
    token: Secret<String>,
    ctx: RelayContext,
}

impl DiscordSessionFactory {
    pub fn new(token: Secret<String>, ctx: RelayContext) -> Self {
        Self { token, ctx }
    }
}

impl SessionFactory for DiscordSessionFactory {
    fn build(&self) -> Result<RelaySession> {
        let source = DiscordSource::new(self.token.clone());
        let relay = Relay::new(self.ctx.clone(), WebhookClient::new()?);
        Ok(RelaySession::new(Box::new(source), relay))
    }
}
