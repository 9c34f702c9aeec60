use {indexmap::IndexMap, tracing::info};

use crate::{Error, Result};

/// How a route was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Substring match on the decimal form of the IDs.
    Partial,
}

/// Resolved destination for an inbound channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    /// Configured channel ID that matched.
    pub channel_id: u64,
    pub webhook_url: &'a str,
    pub kind: MatchKind,
}

/// Immutable channel → webhook table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ChannelRouter {
    routes: IndexMap<u64, String>,
}

impl ChannelRouter {
    /// Build a router, rejecting entries with an empty webhook URL.
    ///
    /// Iteration order (and therefore partial-match precedence) follows the
    /// order of `routes`.
    pub fn new(routes: impl IntoIterator<Item = (u64, String)>) -> Result<Self> {
        let mut table = IndexMap::new();
        for (channel_id, webhook_url) in routes {
            if webhook_url.trim().is_empty() {
                return Err(Error::MissingWebhook { channel_id });
            }
            table.insert(channel_id, webhook_url);
        }
        Ok(Self { routes: table })
    }

    /// Resolve `channel_id` to a destination.
    ///
    /// An exact match always wins. Otherwise the first configured ID whose
    /// decimal string contains, or is contained in, `channel_id`'s is used.
    /// Numeric IDs sharing a digit run can cross-match here.
    pub fn resolve(&self, channel_id: u64) -> Option<Route<'_>> {
        if let Some(webhook_url) = self.routes.get(&channel_id) {
            return Some(Route {
                channel_id,
                webhook_url,
                kind: MatchKind::Exact,
            });
        }

        let inbound = channel_id.to_string();
        let (configured, webhook_url) = self.routes.iter().find(|(configured, _)| {
            let configured = configured.to_string();
            configured.contains(&inbound) || inbound.contains(&configured)
        })?;

        info!(
            channel_id,
            configured_channel_id = *configured,
            "partial channel ID match"
        );
        Some(Route {
            channel_id: *configured,
            webhook_url,
            kind: MatchKind::Partial,
        })
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.routes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
