mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryJobRepo;
pub use postgres::PostgresJobRepo;
use tickler_domain::{DueJob, Job};

#[async_trait::async_trait]
pub trait IJobRepo: Send + Sync {
    /// Creates a pending job. Returns `false` without touching anything when a
    /// job for the same `(reminder_id, report_at)` already exists.
    async fn insert(&self, reminder_id: i64, report_at: DateTime<Utc>) -> anyhow::Result<bool>;
    /// Pending jobs with `report_at <= now`, earliest first
    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<DueJob>>;
    /// Returns `false` when the job was already marked as sent
    async fn mark_sent(&self, job_id: i64, sent_at: DateTime<Utc>) -> anyhow::Result<bool>;
    async fn find_by_reminder(&self, reminder_id: i64) -> anyhow::Result<Vec<Job>>;
}

#[cfg(test)]
mod tests {
    use crate::BotContext;
    use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
    use std::sync::Arc;
    use tickler_domain::{NewReminder, ReminderSchedule, WeeklyRule};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap()
    }

    async fn insert_reminder(ctx: &BotContext, schedule: ReminderSchedule) -> i64 {
        ctx.repos
            .reminders
            .insert(&NewReminder {
                chat_id: 9,
                message: "standup".into(),
                lead_minutes: 15,
                schedule,
                created_at: now(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_is_deduplicated() {
        let ctx = BotContext::create_inmemory();
        let id = insert_reminder(&ctx, ReminderSchedule::Once { due: now() }).await;

        assert!(ctx.repos.jobs.insert(id, now()).await.unwrap());
        assert!(!ctx.repos.jobs.insert(id, now()).await.unwrap());
        assert!(ctx
            .repos
            .jobs
            .insert(id, now() + Duration::minutes(1))
            .await
            .unwrap());
        assert_eq!(ctx.repos.jobs.find_by_reminder(id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_inserts_create_one_job() {
        let ctx = Arc::new(BotContext::create_inmemory());
        let id = insert_reminder(&ctx, ReminderSchedule::Once { due: now() }).await;

        let handles = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                tokio::spawn(async move { ctx.repos.jobs.insert(id, now()).await.unwrap() })
            })
            .collect::<Vec<_>>();
        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(ctx.repos.jobs.find_by_reminder(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sent_pair_is_not_recreated() {
        let ctx = BotContext::create_inmemory();
        let id = insert_reminder(&ctx, ReminderSchedule::Once { due: now() }).await;
        ctx.repos.jobs.insert(id, now()).await.unwrap();
        let job = ctx.repos.jobs.find_by_reminder(id).await.unwrap()[0].clone();

        assert!(ctx.repos.jobs.mark_sent(job.id, now()).await.unwrap());
        assert!(!ctx.repos.jobs.insert(id, now()).await.unwrap());
        let jobs = ctx.repos.jobs.find_by_reminder(id).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(!jobs[0].is_pending());
    }

    #[tokio::test]
    async fn mark_sent_is_idempotent() {
        let ctx = BotContext::create_inmemory();
        let id = insert_reminder(&ctx, ReminderSchedule::Once { due: now() }).await;
        ctx.repos.jobs.insert(id, now()).await.unwrap();
        let job = ctx.repos.jobs.find_by_reminder(id).await.unwrap()[0].clone();

        assert!(ctx.repos.jobs.mark_sent(job.id, now()).await.unwrap());
        assert!(!ctx
            .repos
            .jobs
            .mark_sent(job.id, now() + Duration::minutes(1))
            .await
            .unwrap());
        let job = ctx.repos.jobs.find_by_reminder(id).await.unwrap()[0].clone();
        assert_eq!(job.sent_at, Some(now()));
    }

    #[tokio::test]
    async fn due_jobs_are_joined_and_ordered() {
        let ctx = BotContext::create_inmemory();
        let rule = WeeklyRule::new(Weekday::Mon, 9, 0).unwrap();
        let weekly = insert_reminder(
            &ctx,
            ReminderSchedule::Weekly {
                rule,
                next_occurrence: Some(now()),
            },
        )
        .await;
        let once = insert_reminder(&ctx, ReminderSchedule::Once { due: now() }).await;

        let jobs = &ctx.repos.jobs;
        jobs.insert(once, now() - Duration::minutes(1)).await.unwrap();
        jobs.insert(weekly, now() - Duration::minutes(5)).await.unwrap();
        jobs.insert(weekly, now() + Duration::minutes(5)).await.unwrap();

        let due = jobs.find_due(now(), 200).await.unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].reminder_id, weekly);
        assert_eq!(due[0].weekly_rule, Some(rule));
        assert_eq!(due[0].chat_id, 9);
        assert_eq!(due[0].lead_minutes, 15);
        assert_eq!(due[1].reminder_id, once);
        assert_eq!(due[1].weekly_rule, None);

        jobs.mark_sent(due[0].job_id, now()).await.unwrap();
        let due = jobs.find_due(now(), 200).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(jobs.find_due(now(), 0).await.unwrap().len(), 0);
    }
}
