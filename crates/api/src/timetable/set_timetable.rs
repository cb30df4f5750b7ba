use super::TIMETABLE_USAGE;
use crate::shared::usecase::{execute, UseCase};
use crate::updates::STORAGE_FAILURE_REPLY;
use tickler_domain::{parse_timetable, TimetableParseError};
use tickler_infra::BotContext;

pub async fn set_timetable_command(ctx: &BotContext, chat_id: i64, entries: &str) -> String {
    let usecase = SetTimetableUseCase {
        chat_id,
        entries: entries.to_string(),
    };

    match execute(usecase, ctx).await {
        Ok(count) => format!("Timetable saved: {} entries.", count),
        Err(UseCaseError::Empty) => TIMETABLE_USAGE.to_string(),
        Err(UseCaseError::InvalidEntries(e)) => format!("{}\n\n{}", e, TIMETABLE_USAGE),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

/// Replaces the whole weekly timetable of the chat
#[derive(Debug)]
pub struct SetTimetableUseCase {
    pub chat_id: i64,
    pub entries: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    Empty,
    InvalidEntries(TimetableParseError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetTimetableUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "SetTimetable";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let entries = parse_timetable(&self.entries).map_err(UseCaseError::InvalidEntries)?;
        if entries.is_empty() {
            return Err(UseCaseError::Empty);
        }

        ctx.storage(ctx.repos.timetable.replace(self.chat_id, &entries))
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(entries.len())
    }
}
