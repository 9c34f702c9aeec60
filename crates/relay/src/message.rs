use {serde::Serialize, serde_json::Value};

/// Maximum number of embeds Discord accepts on a webhook message.
pub const EMBED_LIMIT: usize = 10;

/// A message-created event, reduced to what the relay needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingMessage {
    pub channel_id: u64,
    /// Raw text content, possibly empty.
    pub content: String,
    pub author_name: String,
    pub author_avatar_url: String,
    pub author_is_bot: bool,
    /// Embeds as JSON trees, in message order.
    pub embeds: Vec<Value>,
}

/// Webhook execution body plus its destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    #[serde(skip)]
    pub webhook_url: String,
    pub content: String,
    pub username: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
}
