mod inmemory;
mod postgres;

use chrono::NaiveTime;
pub use inmemory::InMemoryChatSettingsRepo;
pub use postgres::PostgresChatSettingsRepo;
use tickler_domain::{ChatDigestSlot, ChatSettings};

#[async_trait::async_trait]
pub trait IChatSettingsRepo: Send + Sync {
    /// Creates default settings for the chat unless they already exist
    async fn ensure(&self, chat_id: i64) -> anyhow::Result<()>;
    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<ChatSettings>>;
    async fn upsert_timezone(&self, chat_id: i64, timezone: &str) -> anyhow::Result<()>;
    async fn upsert_digest_time(
        &self,
        chat_id: i64,
        digest_time: Option<NaiveTime>,
    ) -> anyhow::Result<()>;
    async fn find_with_active_digest(&self) -> anyhow::Result<Vec<ChatDigestSlot>>;
}
