use crate::shared::usecase::{execute, UseCase};
use crate::updates::STORAGE_FAILURE_REPLY;
use chrono::NaiveTime;
use tickler_domain::date::parse_clock_time;
use tickler_infra::BotContext;

pub const REPORT_USAGE: &str = "Examples:\n/report 20:00 (the daily digest arrives at that local time)\n/report off (turns the daily digest off)";

/// `/report HH:MM` or `/report off`
pub async fn set_digest_time_command(ctx: &BotContext, chat_id: i64, args: &str) -> String {
    let args = args.trim();
    let digest_time = if args.eq_ignore_ascii_case("off") {
        None
    } else {
        match parse_clock_time(args) {
            Some(time) => Some(time),
            None => return REPORT_USAGE.to_string(),
        }
    };

    let usecase = SetDigestTimeUseCase {
        chat_id,
        digest_time,
    };
    match execute(usecase, ctx).await {
        Ok(()) => match digest_time {
            Some(time) => format!("OK, the daily digest will arrive at {}.", time.format("%H:%M")),
            None => "Daily digest turned off.".to_string(),
        },
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

#[derive(Debug)]
pub struct SetDigestTimeUseCase {
    pub chat_id: i64,
    /// `None` disables the digest
    pub digest_time: Option<NaiveTime>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetDigestTimeUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SetDigestTime";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        ctx.storage(
            ctx.repos
                .chat_settings
                .upsert_digest_time(self.chat_id, self.digest_time),
        )
        .await
        .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{context_at, local};

    #[actix_web::test]
    async fn sets_and_clears_digest_time() {
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));

        let reply = set_digest_time_command(&ctx, 1, "20:00").await;
        assert_eq!(reply, "OK, the daily digest will arrive at 20:00.");
        let slots = ctx.repos.chat_settings.find_with_active_digest().await.unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].digest_time, NaiveTime::from_hms_opt(20, 0, 0).unwrap());

        let reply = set_digest_time_command(&ctx, 1, "OFF").await;
        assert_eq!(reply, "Daily digest turned off.");
        let slots = ctx.repos.chat_settings.find_with_active_digest().await.unwrap();
        assert!(slots.is_empty());
    }

    #[actix_web::test]
    async fn rejects_invalid_times() {
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));
        for args in ["", "25:00", "8pm", "20:0"] {
            assert_eq!(set_digest_time_command(&ctx, 1, args).await, REPORT_USAGE);
        }
        assert!(ctx.repos.chat_settings.find(1).await.unwrap().is_none());
    }
}
