use super::IReminderRepo;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tickler_domain::{NewReminder, Reminder, ReminderSchedule, WeeklyRule};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_id: i64,
    chat_id: i64,
    message: String,
    lead_minutes: i64,
    event_time: Option<DateTime<Utc>>,
    reminder_rule: Option<String>,
    next_occurrence: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(e: ReminderRaw) -> Result<Self, Self::Error> {
        let schedule = match (e.event_time, e.reminder_rule) {
            (Some(due), None) => ReminderSchedule::Once { due },
            (None, Some(rule)) => ReminderSchedule::Weekly {
                rule: rule.parse::<WeeklyRule>()?,
                next_occurrence: e.next_occurrence,
            },
            _ => {
                return Err(anyhow!(
                    "Reminder {} must have exactly one of event_time and reminder_rule",
                    e.reminder_id
                ))
            }
        };
        Ok(Self {
            id: e.reminder_id,
            chat_id: e.chat_id,
            message: e.message,
            lead_minutes: e.lead_minutes,
            schedule,
            created_at: e.created_at,
        })
    }
}

/// Converts rows, logging and skipping the ones that do not map to a valid
/// `Reminder`
fn into_reminders(rows: Vec<ReminderRaw>) -> Vec<Reminder> {
    rows.into_iter()
        .filter_map(|row| {
            let reminder_id = row.reminder_id;
            Reminder::try_from(row)
                .map_err(|e| error!(reminder_id = reminder_id, "Skipping malformed reminder: {:?}", e))
                .ok()
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<i64> {
        let (event_time, reminder_rule, next_occurrence) = match &reminder.schedule {
            ReminderSchedule::Once { due } => (Some(*due), None, None),
            ReminderSchedule::Weekly {
                rule,
                next_occurrence,
            } => (None, Some(rule.to_string()), *next_occurrence),
        };
        let (reminder_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO reminders(chat_id, message, lead_minutes, event_time, reminder_rule, next_occurrence, created_at)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            RETURNING reminder_id
            "#,
        )
        .bind(reminder.chat_id)
        .bind(&reminder.message)
        .bind(reminder.lead_minutes)
        .bind(event_time)
        .bind(reminder_rule)
        .bind(next_occurrence)
        .bind(reminder.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;
        Ok(reminder_id)
    }

    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE reminder_id = $1
            "#,
        )
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                reminder_id = reminder_id,
                "Find reminder failed. DB returned error: {:?}", e
            );
            e
        })?;
        res.map(Reminder::try_from).transpose()
    }

    async fn update_next_occurrence(
        &self,
        reminder_id: i64,
        next_occurrence: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET next_occurrence = $2
            WHERE reminder_id = $1 AND reminder_rule IS NOT NULL
            "#,
        )
        .bind(reminder_id)
        .bind(next_occurrence)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                reminder_id = reminder_id,
                "Unable to update next occurrence. DB returned error: {:?}", e
            );
            e
        })?;
        Ok(())
    }

    async fn find_upcoming(
        &self,
        chat_id: i64,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE chat_id = $1
              AND COALESCE(next_occurrence, event_time) >= $2
              AND ($3::timestamptz IS NULL OR COALESCE(next_occurrence, event_time) < $3)
            ORDER BY COALESCE(next_occurrence, event_time) ASC, reminder_id ASC
            LIMIT $4
            "#,
        )
        .bind(chat_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                chat_id = chat_id,
                "Find upcoming reminders failed. DB returned error: {:?}", e
            );
            e
        })?;
        Ok(into_reminders(rows))
    }
}
