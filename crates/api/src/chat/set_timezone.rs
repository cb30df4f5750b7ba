use crate::shared::usecase::{execute, UseCase};
use crate::updates::STORAGE_FAILURE_REPLY;
use tickler_domain::ChatTimezone;
use tickler_infra::BotContext;

pub const TIMEZONE_EXAMPLES: &str =
    "Examples:\n/timezone Europe/Moscow\n/timezone Asia/Krasnoyarsk\n/timezone UTC+3";

/// `/timezone <tz>`
pub async fn set_timezone_command(ctx: &BotContext, chat_id: i64, args: &str) -> String {
    let timezone = args.trim();
    if timezone.is_empty() {
        return TIMEZONE_EXAMPLES.to_string();
    }

    let usecase = SetTimezoneUseCase {
        chat_id,
        timezone: timezone.to_string(),
    };
    match execute(usecase, ctx).await {
        Ok(tz) => format!(
            "Timezone updated: {}. Your local time is {}.",
            tz,
            tz.local(&ctx.sys.now()).format("%H:%M")
        ),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

/// Stores the timezone as given. It is resolved whenever it is used, so
/// unknown names end up as UTC.
#[derive(Debug)]
pub struct SetTimezoneUseCase {
    pub chat_id: i64,
    pub timezone: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetTimezoneUseCase {
    type Response = ChatTimezone;

    type Error = UseCaseError;

    const NAME: &'static str = "SetTimezone";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        ctx.storage(
            ctx.repos
                .chat_settings
                .upsert_timezone(self.chat_id, &self.timezone),
        )
        .await
        .map_err(|_| UseCaseError::StorageError)?;

        Ok(ChatTimezone::resolve(&self.timezone))
    }
}
