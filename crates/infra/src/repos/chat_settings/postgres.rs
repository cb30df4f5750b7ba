use super::IChatSettingsRepo;
use chrono::NaiveTime;
use sqlx::{FromRow, PgPool};
use tickler_domain::{ChatDigestSlot, ChatSettings, DEFAULT_TIMEZONE};
use tracing::error;

pub struct PostgresChatSettingsRepo {
    pool: PgPool,
}

impl PostgresChatSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ChatSettingsRaw {
    chat_id: i64,
    timezone: String,
    digest_time: Option<NaiveTime>,
}

impl From<ChatSettingsRaw> for ChatSettings {
    fn from(e: ChatSettingsRaw) -> Self {
        Self {
            chat_id: e.chat_id,
            timezone: e.timezone,
            digest_time: e.digest_time,
        }
    }
}

#[derive(Debug, FromRow)]
struct ChatDigestSlotRaw {
    chat_id: i64,
    timezone: String,
    digest_time: NaiveTime,
}

impl From<ChatDigestSlotRaw> for ChatDigestSlot {
    fn from(e: ChatDigestSlotRaw) -> Self {
        Self {
            chat_id: e.chat_id,
            timezone: e.timezone,
            digest_time: e.digest_time,
        }
    }
}

#[async_trait::async_trait]
impl IChatSettingsRepo for PostgresChatSettingsRepo {
    async fn ensure(&self, chat_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_settings(chat_id, timezone)
            VALUES($1, $2)
            ON CONFLICT (chat_id) DO NOTHING
            "#,
        )
        .bind(chat_id)
        .bind(DEFAULT_TIMEZONE)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(chat_id = chat_id, "Unable to ensure chat settings. DB returned error: {:?}", e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<ChatSettings>> {
        let res: Option<ChatSettingsRaw> = sqlx::query_as(
            r#"
            SELECT chat_id, timezone, digest_time FROM chat_settings
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(chat_id = chat_id, "Find chat settings failed. DB returned error: {:?}", e);
            e
        })?;
        Ok(res.map(|settings| settings.into()))
    }

    async fn upsert_timezone(&self, chat_id: i64, timezone: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_settings(chat_id, timezone)
            VALUES($1, $2)
            ON CONFLICT (chat_id) DO UPDATE SET timezone = EXCLUDED.timezone
            "#,
        )
        .bind(chat_id)
        .bind(timezone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                chat_id = chat_id,
                "Unable to save timezone: {}. DB returned error: {:?}", timezone, e
            );
            e
        })?;
        Ok(())
    }

    async fn upsert_digest_time(
        &self,
        chat_id: i64,
        digest_time: Option<NaiveTime>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_settings(chat_id, timezone, digest_time)
            VALUES($1, $2, $3)
            ON CONFLICT (chat_id) DO UPDATE SET digest_time = EXCLUDED.digest_time
            "#,
        )
        .bind(chat_id)
        .bind(DEFAULT_TIMEZONE)
        .bind(digest_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                chat_id = chat_id,
                "Unable to save digest time: {:?}. DB returned error: {:?}", digest_time, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_with_active_digest(&self) -> anyhow::Result<Vec<ChatDigestSlot>> {
        let slots: Vec<ChatDigestSlotRaw> = sqlx::query_as(
            r#"
            SELECT chat_id, timezone, digest_time FROM chat_settings
            WHERE digest_time IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find chats with active digest failed. DB returned error: {:?}", e);
            e
        })?;
        Ok(slots.into_iter().map(|slot| slot.into()).collect())
    }
}
