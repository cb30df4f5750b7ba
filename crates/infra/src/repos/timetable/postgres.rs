use super::ITimetableRepo;
use anyhow::anyhow;
use chrono::{NaiveTime, Weekday};
use sqlx::{FromRow, PgPool};
use tickler_domain::WeeklyScheduleEntry;
use tracing::error;

pub struct PostgresTimetableRepo {
    pool: PgPool,
}

impl PostgresTimetableRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WeeklyScheduleEntryRaw {
    weekday: i16,
    start_time: NaiveTime,
    end_time: Option<NaiveTime>,
    title: String,
}

impl TryFrom<WeeklyScheduleEntryRaw> for WeeklyScheduleEntry {
    type Error = anyhow::Error;

    fn try_from(e: WeeklyScheduleEntryRaw) -> Result<Self, Self::Error> {
        let weekday = weekday_from_number(e.weekday)
            .ok_or_else(|| anyhow!("Invalid weekday number: {}", e.weekday))?;
        Ok(Self {
            weekday,
            start: e.start_time,
            end: e.end_time,
            title: e.title,
        })
    }
}

/// 1 = Monday ... 7 = Sunday
fn weekday_from_number(n: i16) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

#[async_trait::async_trait]
impl ITimetableRepo for PostgresTimetableRepo {
    async fn replace(&self, chat_id: i64, entries: &[WeeklyScheduleEntry]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM weekly_schedule WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO weekly_schedule(chat_id, weekday, start_time, end_time, title)
                VALUES($1, $2, $3, $4, $5)
                "#,
            )
            .bind(chat_id)
            .bind(entry.weekday.number_from_monday() as i16)
            .bind(entry.start)
            .bind(entry.end)
            .bind(&entry.title)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    chat_id = chat_id,
                    "Unable to insert timetable entry: {:?}. DB returned error: {:?}", entry, e
                );
                e
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<WeeklyScheduleEntry>> {
        let rows: Vec<WeeklyScheduleEntryRaw> = sqlx::query_as(
            r#"
            SELECT weekday, start_time, end_time, title FROM weekly_schedule
            WHERE chat_id = $1
            ORDER BY weekday ASC, start_time ASC, entry_id ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                chat_id = chat_id,
                "Find timetable failed. DB returned error: {:?}", e
            );
            e
        })?;
        rows.into_iter().map(WeeklyScheduleEntry::try_from).collect()
    }

    async fn clear(&self, chat_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM weekly_schedule WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    chat_id = chat_id,
                    "Unable to clear timetable. DB returned error: {:?}", e
                );
                e
            })?;
        Ok(())
    }
}
