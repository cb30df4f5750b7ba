use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tickler_domain::{NewReminder, Reminder, ReminderSchedule};

pub struct InMemoryReminderRepo {
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryReminderRepo {
    /// The collection is shared with the in-memory job repository, which
    /// needs it to join due jobs with their reminders
    pub fn new(reminders: Arc<Mutex<Vec<Reminder>>>) -> Self {
        Self { reminders }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<i64> {
        insert_new(
            &self.reminders,
            |_| false,
            |id| Reminder {
                id,
                chat_id: reminder.chat_id,
                message: reminder.message.clone(),
                lead_minutes: reminder.lead_minutes,
                schedule: reminder.schedule.clone(),
                created_at: reminder.created_at,
            },
        )
        .ok_or_else(|| anyhow::anyhow!("Unable to insert reminder: {:?}", reminder))
    }

    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn update_next_occurrence(
        &self,
        reminder_id: i64,
        next_occurrence: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        update_many(
            &self.reminders,
            |r| r.id == reminder_id,
            |r| {
                if let ReminderSchedule::Weekly { rule, .. } = r.schedule {
                    r.schedule = ReminderSchedule::Weekly {
                        rule,
                        next_occurrence: Some(next_occurrence),
                    };
                }
            },
        );
        Ok(())
    }

    async fn find_upcoming(
        &self,
        chat_id: i64,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| {
            r.chat_id == chat_id
                && match r.schedule.effective_time() {
                    Some(at) => at >= from && to.map(|to| at < to).unwrap_or(true),
                    None => false,
                }
        });
        reminders.sort_by_key(|r| (r.schedule.effective_time(), r.id));
        reminders.truncate(limit.max(0) as usize);
        Ok(reminders)
    }
}
