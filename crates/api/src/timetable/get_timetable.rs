use crate::shared::usecase::{execute, UseCase};
use crate::updates::STORAGE_FAILURE_REPLY;
use tickler_domain::{render_timetable, WeeklyScheduleEntry};
use tickler_infra::BotContext;

pub async fn get_timetable_command(ctx: &BotContext, chat_id: i64) -> String {
    match execute(GetTimetableUseCase { chat_id }, ctx).await {
        Ok(entries) if entries.is_empty() => "Your timetable is empty.".to_string(),
        Ok(entries) => render_timetable(&entries).trim_end().to_string(),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

#[derive(Debug)]
pub struct GetTimetableUseCase {
    pub chat_id: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTimetableUseCase {
    type Response = Vec<WeeklyScheduleEntry>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTimetable";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        ctx.storage(ctx.repos.timetable.find_by_chat(self.chat_id))
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
