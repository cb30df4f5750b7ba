mod inmemory;
mod postgres;

pub use inmemory::InMemoryTimetableRepo;
pub use postgres::PostgresTimetableRepo;
use tickler_domain::WeeklyScheduleEntry;

#[async_trait::async_trait]
pub trait ITimetableRepo: Send + Sync {
    /// Replaces the whole timetable of the chat in one go
    async fn replace(&self, chat_id: i64, entries: &[WeeklyScheduleEntry]) -> anyhow::Result<()>;
    /// Ordered by weekday, Monday first, then start time
    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<WeeklyScheduleEntry>>;
    async fn clear(&self, chat_id: i64) -> anyhow::Result<()>;
}
