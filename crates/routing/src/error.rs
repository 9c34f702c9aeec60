#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no webhook configured for channel {channel_id}")]
    MissingWebhook { channel_id: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
