use crate::shared::usecase::{execute, UseCase};
use crate::updates::STORAGE_FAILURE_REPLY;
use tickler_infra::BotContext;

pub async fn clear_timetable_command(ctx: &BotContext, chat_id: i64) -> String {
    match execute(ClearTimetableUseCase { chat_id }, ctx).await {
        Ok(()) => "Timetable cleared.".to_string(),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

#[derive(Debug)]
pub struct ClearTimetableUseCase {
    pub chat_id: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ClearTimetableUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "ClearTimetable";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        ctx.storage(ctx.repos.timetable.clear(self.chat_id))
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
