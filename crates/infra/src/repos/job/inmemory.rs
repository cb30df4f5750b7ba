use super::IJobRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tickler_domain::{DueJob, Job, Reminder};

pub struct InMemoryJobRepo {
    jobs: Mutex<Vec<Job>>,
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryJobRepo {
    pub fn new(reminders: Arc<Mutex<Vec<Reminder>>>) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            reminders,
        }
    }
}

#[async_trait::async_trait]
impl IJobRepo for InMemoryJobRepo {
    async fn insert(&self, reminder_id: i64, report_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let inserted = insert_new(
            &self.jobs,
            |j| j.reminder_id == reminder_id && j.report_at == report_at,
            |id| Job {
                id,
                reminder_id,
                report_at,
                sent_at: None,
            },
        );
        Ok(inserted.is_some())
    }

    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<DueJob>> {
        let mut due = find_by(&self.jobs, |j| j.is_pending() && j.report_at <= now);
        due.sort_by_key(|j| (j.report_at, j.id));

        let due_jobs = due
            .into_iter()
            .filter_map(|job| {
                let reminder = find(job.reminder_id, &self.reminders)?;
                Some(DueJob {
                    job_id: job.id,
                    reminder_id: job.reminder_id,
                    report_at: job.report_at,
                    chat_id: reminder.chat_id,
                    message: reminder.message,
                    lead_minutes: reminder.lead_minutes,
                    weekly_rule: reminder.schedule.weekly_rule(),
                })
            })
            .take(limit.max(0) as usize)
            .collect();
        Ok(due_jobs)
    }

    async fn mark_sent(&self, job_id: i64, sent_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.jobs,
            |j| j.id == job_id && j.is_pending(),
            |j| j.sent_at = Some(sent_at),
        );
        Ok(updated > 0)
    }

    async fn find_by_reminder(&self, reminder_id: i64) -> anyhow::Result<Vec<Job>> {
        let mut jobs = find_by(&self.jobs, |j| j.reminder_id == reminder_id);
        jobs.sort_by_key(|j| j.report_at);
        Ok(jobs)
    }
}
