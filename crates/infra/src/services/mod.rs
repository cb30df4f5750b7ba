mod inmemory;
mod telegram;

pub use inmemory::{InMemoryMessenger, SentMessage};
pub use telegram::TelegramMessenger;

/// Delivers text to chats. Failures are reported to the caller and never
/// retried here.
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;
    /// Registers `url` as the endpoint updates are pushed to
    async fn set_webhook(&self, url: &str, secret: &str) -> anyhow::Result<()>;
}
