use super::IChatSettingsRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::NaiveTime;
use std::sync::Mutex;
use tickler_domain::{ChatDigestSlot, ChatSettings};

pub struct InMemoryChatSettingsRepo {
    settings: Mutex<Vec<ChatSettings>>,
}

impl InMemoryChatSettingsRepo {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(Vec::new()),
        }
    }

    fn upsert<F: Fn(&mut ChatSettings)>(&self, chat_id: i64, update: F) {
        if update_many(&self.settings, |s| s.chat_id == chat_id, &update) > 0 {
            return;
        }
        let mut settings = ChatSettings::new(chat_id);
        update(&mut settings);
        if !insert_unless(&settings, &self.settings, |s| s.chat_id == chat_id) {
            // Created concurrently in the meantime
            update_many(&self.settings, |s| s.chat_id == chat_id, &update);
        }
    }
}

#[async_trait::async_trait]
impl IChatSettingsRepo for InMemoryChatSettingsRepo {
    async fn ensure(&self, chat_id: i64) -> anyhow::Result<()> {
        insert_unless(&ChatSettings::new(chat_id), &self.settings, |s| {
            s.chat_id == chat_id
        });
        Ok(())
    }

    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<ChatSettings>> {
        Ok(find(chat_id, &self.settings))
    }

    async fn upsert_timezone(&self, chat_id: i64, timezone: &str) -> anyhow::Result<()> {
        self.upsert(chat_id, |settings| settings.timezone = timezone.to_string());
        Ok(())
    }

    async fn upsert_digest_time(
        &self,
        chat_id: i64,
        digest_time: Option<NaiveTime>,
    ) -> anyhow::Result<()> {
        self.upsert(chat_id, |settings| settings.digest_time = digest_time);
        Ok(())
    }

    async fn find_with_active_digest(&self) -> anyhow::Result<Vec<ChatDigestSlot>> {
        let slots = find_by(&self.settings, |s| s.digest_time.is_some())
            .into_iter()
            .filter_map(|s| {
                Some(ChatDigestSlot {
                    chat_id: s.chat_id,
                    digest_time: s.digest_time?,
                    timezone: s.timezone,
                })
            })
            .collect();
        Ok(slots)
    }
}
