use super::ITimetableRepo;
use crate::repos::shared::inmemory_repo::*;
use std::sync::Mutex;
use tickler_domain::WeeklyScheduleEntry;

pub struct InMemoryTimetableRepo {
    entries: Mutex<Vec<(i64, WeeklyScheduleEntry)>>,
}

impl InMemoryTimetableRepo {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITimetableRepo for InMemoryTimetableRepo {
    async fn replace(&self, chat_id: i64, entries: &[WeeklyScheduleEntry]) -> anyhow::Result<()> {
        let entries = entries
            .iter()
            .map(|entry| (chat_id, entry.clone()))
            .collect();
        replace_by(&self.entries, |(chat, _)| *chat == chat_id, entries);
        Ok(())
    }

    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<WeeklyScheduleEntry>> {
        let mut entries = find_by(&self.entries, |(chat, _)| *chat == chat_id)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect::<Vec<_>>();
        entries.sort_by_key(|e| (e.weekday.number_from_monday(), e.start));
        Ok(entries)
    }

    async fn clear(&self, chat_id: i64) -> anyhow::Result<()> {
        delete_by(&self.entries, |(chat, _)| *chat == chat_id);
        Ok(())
    }
}
