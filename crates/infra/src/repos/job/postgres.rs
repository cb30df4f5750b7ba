use super::IJobRepo;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tickler_domain::{DueJob, Job, WeeklyRule};
use tracing::error;

pub struct PostgresJobRepo {
    pool: PgPool,
}

impl PostgresJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct JobRaw {
    job_id: i64,
    reminder_id: i64,
    report_time: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
}

impl From<JobRaw> for Job {
    fn from(e: JobRaw) -> Self {
        Self {
            id: e.job_id,
            reminder_id: e.reminder_id,
            report_at: e.report_time,
            sent_at: e.sent_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DueJobRaw {
    job_id: i64,
    reminder_id: i64,
    report_time: DateTime<Utc>,
    chat_id: i64,
    message: String,
    lead_minutes: i64,
    reminder_rule: Option<String>,
}

impl TryFrom<DueJobRaw> for DueJob {
    type Error = anyhow::Error;

    fn try_from(e: DueJobRaw) -> Result<Self, Self::Error> {
        let weekly_rule = e
            .reminder_rule
            .map(|rule| rule.parse::<WeeklyRule>())
            .transpose()?;
        Ok(Self {
            job_id: e.job_id,
            reminder_id: e.reminder_id,
            report_at: e.report_time,
            chat_id: e.chat_id,
            message: e.message,
            lead_minutes: e.lead_minutes,
            weekly_rule,
        })
    }
}

/// Separates the rows that convert into due jobs from the ids of those that
/// do not
fn split_malformed(rows: Vec<DueJobRaw>) -> (Vec<DueJob>, Vec<i64>) {
    let mut due = Vec::with_capacity(rows.len());
    let mut malformed = Vec::new();
    for row in rows {
        let job_id = row.job_id;
        match DueJob::try_from(row) {
            Ok(job) => due.push(job),
            Err(e) => {
                error!(job_id = job_id, "Skipping malformed due job: {:?}", e);
                malformed.push(job_id);
            }
        }
    }
    (due, malformed)
}

#[async_trait::async_trait]
impl IJobRepo for PostgresJobRepo {
    async fn insert(&self, reminder_id: i64, report_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO reminder_jobs(reminder_id, report_time)
            VALUES($1, $2)
            ON CONFLICT (reminder_id, report_time) DO NOTHING
            "#,
        )
        .bind(reminder_id)
        .bind(report_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                reminder_id = reminder_id,
                "Unable to insert job at {}. DB returned error: {:?}", report_at, e
            );
            e
        })?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<DueJob>> {
        let rows: Vec<DueJobRaw> = sqlx::query_as(
            r#"
            SELECT j.job_id, j.reminder_id, j.report_time, r.chat_id, r.message, r.lead_minutes, r.reminder_rule
            FROM reminder_jobs AS j
            INNER JOIN reminders AS r ON r.reminder_id = j.reminder_id
            WHERE j.sent_at IS NULL AND j.report_time <= $1
            ORDER BY j.report_time ASC, j.job_id ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find due jobs failed. DB returned error: {:?}", e);
            e
        })?;

        let (due, malformed) = split_malformed(rows);
        if !malformed.is_empty() {
            // Retired so they stop taking up room in every batch
            sqlx::query(
                r#"
                UPDATE reminder_jobs
                SET sent_at = $2
                WHERE job_id = ANY($1) AND sent_at IS NULL
                "#,
            )
            .bind(&malformed[..])
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to retire malformed jobs {:?}. DB returned error: {:?}",
                    malformed, e
                );
                e
            })?;
        }
        Ok(due)
    }

    async fn mark_sent(&self, job_id: i64, sent_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminder_jobs
            SET sent_at = $2
            WHERE job_id = $1 AND sent_at IS NULL
            "#,
        )
        .bind(job_id)
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                job_id = job_id,
                "Unable to mark job as sent. DB returned error: {:?}", e
            );
            e
        })?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_by_reminder(&self, reminder_id: i64) -> anyhow::Result<Vec<Job>> {
        let jobs: Vec<JobRaw> = sqlx::query_as(
            r#"
            SELECT job_id, reminder_id, report_time, sent_at FROM reminder_jobs
            WHERE reminder_id = $1
            ORDER BY report_time ASC
            "#,
        )
        .bind(reminder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                reminder_id = reminder_id,
                "Find jobs of reminder failed. DB returned error: {:?}", e
            );
            e
        })?;
        Ok(jobs.into_iter().map(|job| job.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(job_id: i64, reminder_rule: Option<&str>) -> DueJobRaw {
        DueJobRaw {
            job_id,
            reminder_id: job_id * 10,
            report_time: Utc.with_ymd_and_hms(2025, 3, 17, 5, 30, 0).unwrap(),
            chat_id: 1,
            message: "standup".into(),
            lead_minutes: 30,
            reminder_rule: reminder_rule.map(String::from),
        }
    }

    #[test]
    fn malformed_rules_are_split_out() {
        let rows = vec![
            row(1, None),
            row(2, Some("FREQ=WEEKLY;BYDAY=MO;BYHOUR=9;BYMINUTE=0")),
            row(3, Some("FREQ=DAILY;BYHOUR=9")),
            row(4, Some("garbage")),
        ];
        let (due, malformed) = split_malformed(rows);
        assert_eq!(due.iter().map(|j| j.job_id).collect::<Vec<_>>(), [1, 2]);
        assert!(due[0].weekly_rule.is_none());
        assert!(due[1].weekly_rule.is_some());
        assert_eq!(malformed, [3, 4]);
    }
}
