mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use tickler_domain::{NewReminder, Reminder};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Stores the reminder and returns its id
    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<i64>;
    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>>;
    async fn update_next_occurrence(
        &self,
        reminder_id: i64,
        next_occurrence: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    /// Reminders of the chat whose effective time is in `[from, to)`, earliest
    /// first. Without `to` the window is open ended.
    async fn find_upcoming(
        &self,
        chat_id: i64,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>>;
}

#[cfg(test)]
mod tests {
    use crate::BotContext;
    use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
    use tickler_domain::{NewReminder, ReminderSchedule, WeeklyRule};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap()
    }

    fn once(chat_id: i64, message: &str, due: DateTime<Utc>) -> NewReminder {
        NewReminder {
            chat_id,
            message: message.into(),
            lead_minutes: 30,
            schedule: ReminderSchedule::Once { due },
            created_at: now(),
        }
    }

    fn weekly(chat_id: i64, message: &str, next: DateTime<Utc>) -> NewReminder {
        NewReminder {
            chat_id,
            message: message.into(),
            lead_minutes: 0,
            schedule: ReminderSchedule::Weekly {
                rule: WeeklyRule::new(Weekday::Mon, 9, 0).unwrap(),
                next_occurrence: Some(next),
            },
            created_at: now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let ctx = BotContext::create_inmemory();
        let repo = &ctx.repos.reminders;

        let first = repo.insert(&once(1, "dentist", now())).await.unwrap();
        let second = repo.insert(&once(1, "gym", now())).await.unwrap();
        assert_ne!(first, second);

        let reminder = repo.find(first).await.unwrap().unwrap();
        assert_eq!(reminder.id, first);
        assert_eq!(reminder.message, "dentist");
        assert_eq!(reminder.schedule, ReminderSchedule::Once { due: now() });
        assert!(repo.find(first + second + 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn updates_next_occurrence() {
        let ctx = BotContext::create_inmemory();
        let repo = &ctx.repos.reminders;

        let id = repo.insert(&weekly(1, "standup", now())).await.unwrap();
        let later = now() + Duration::weeks(1);
        repo.update_next_occurrence(id, later).await.unwrap();

        let reminder = repo.find(id).await.unwrap().unwrap();
        assert_eq!(reminder.schedule.effective_time(), Some(later));
    }

    #[tokio::test]
    async fn upcoming_is_ordered_by_effective_time_within_window() {
        let ctx = BotContext::create_inmemory();
        let repo = &ctx.repos.reminders;
        let hour = Duration::hours(1);

        repo.insert(&once(1, "c", now() + hour * 3)).await.unwrap();
        repo.insert(&weekly(1, "a", now() + hour)).await.unwrap();
        repo.insert(&once(1, "b", now() + hour * 2)).await.unwrap();
        repo.insert(&once(1, "past", now() - hour)).await.unwrap();
        repo.insert(&once(1, "edge", now() + hour * 4)).await.unwrap();
        repo.insert(&once(2, "other chat", now() + hour)).await.unwrap();

        let titles = |reminders: Vec<tickler_domain::Reminder>| {
            reminders.into_iter().map(|r| r.message).collect::<Vec<_>>()
        };

        let upcoming = repo
            .find_upcoming(1, now(), Some(now() + hour * 4), 50)
            .await
            .unwrap();
        assert_eq!(titles(upcoming), ["a", "b", "c"]);

        let upcoming = repo.find_upcoming(1, now(), None, 50).await.unwrap();
        assert_eq!(titles(upcoming), ["a", "b", "c", "edge"]);

        let upcoming = repo.find_upcoming(1, now(), None, 2).await.unwrap();
        assert_eq!(titles(upcoming), ["a", "b"]);
    }
}
