use crate::shared::{chat_timezone, usecase::UseCase};
use chrono::{DateTime, Utc};
use tickler_domain::DueJob;
use tickler_infra::BotContext;
use tracing::{debug, error, warn};

/// Dispatches every pending job whose report time has come and schedules
/// the next job of weekly reminders.
#[derive(Debug)]
pub struct SendDueRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[derive(Debug, Default, PartialEq)]
pub struct UseCaseRes {
    pub sent: usize,
    pub failed: usize,
    pub rearmed: usize,
}

impl SendDueRemindersUseCase {
    /// Advances a weekly reminder past the occurrence `job` announced.
    /// Returns whether a new job was created.
    pub async fn rearm(ctx: &BotContext, job: &DueJob, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let tz = chat_timezone(ctx, job.chat_id).await?;
        let rearm = match job.rearm(&tz, now) {
            Some(rearm) => rearm,
            None => return Ok(false),
        };

        ctx.storage(
            ctx.repos
                .reminders
                .update_next_occurrence(job.reminder_id, rearm.next_occurrence),
        )
        .await?;
        ctx.storage(ctx.repos.jobs.insert(job.reminder_id, rearm.report_at))
            .await
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due_jobs = ctx
            .storage(ctx.repos.jobs.find_due(now, ctx.config.due_jobs_batch_limit))
            .await
            .map_err(|e| {
                error!(error = %e, "Unable to fetch due jobs");
                UseCaseError::StorageError
            })?;

        let mut res = UseCaseRes::default();
        for job in due_jobs {
            if let Err(e) = ctx.send(job.chat_id, &job.notification_text()).await {
                warn!(
                    job_id = job.job_id,
                    chat_id = job.chat_id,
                    error = %e,
                    "Unable to dispatch reminder, the job stays pending"
                );
                res.failed += 1;
                continue;
            }
            res.sent += 1;

            // The job stays pending until the next one exists
            if job.weekly_rule.is_some() {
                match Self::rearm(ctx, &job, now).await {
                    Ok(true) => res.rearmed += 1,
                    Ok(false) => debug!(
                        reminder_id = job.reminder_id,
                        "Next job of the reminder already exists"
                    ),
                    Err(e) => {
                        error!(
                            reminder_id = job.reminder_id,
                            job_id = job.job_id,
                            error = %e,
                            "Unable to schedule the next occurrence of the reminder, the job stays pending"
                        );
                        continue;
                    }
                }
            }

            match ctx.storage(ctx.repos.jobs.mark_sent(job.job_id, now)).await {
                Ok(true) => (),
                Ok(false) => debug!(job_id = job.job_id, "Job was already marked as sent"),
                Err(e) => error!(job_id = job.job_id, error = %e, "Unable to mark job as sent"),
            }
        }

        Ok(res)
    }
}
