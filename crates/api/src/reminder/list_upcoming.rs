use crate::shared::{
    chat_timezone,
    usecase::{execute, UseCase},
};
use crate::updates::STORAGE_FAILURE_REPLY;
use tickler_domain::{date::ListRange, render_reminder_lines, ChatTimezone, Reminder, DIGEST_LIMIT};
use tickler_infra::BotContext;

pub const LIST_USAGE: &str = "Usage: /list today | week | all";

/// `/list [today|week|all]`
pub async fn list_upcoming_command(ctx: &BotContext, chat_id: i64, args: &str) -> String {
    let range = match args.parse::<ListRange>() {
        Ok(range) => range,
        Err(_) => return LIST_USAGE.to_string(),
    };

    let usecase = ListUpcomingUseCase { chat_id, range };
    match execute(usecase, ctx).await {
        Ok(res) if res.reminders.is_empty() => "Nothing scheduled in that range.".to_string(),
        Ok(res) => render_reminder_lines(&res.reminders, &res.tz),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

#[derive(Debug)]
pub struct ListUpcomingUseCase {
    pub chat_id: i64,
    pub range: ListRange,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminders: Vec<Reminder>,
    pub tz: ChatTimezone,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListUpcomingUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "ListUpcoming";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let tz = chat_timezone(ctx, self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let (from, to) = self.range.window(&tz, ctx.sys.now());

        let reminders = ctx
            .storage(ctx.repos.reminders.find_upcoming(
                self.chat_id,
                from,
                to,
                DIGEST_LIMIT as i64,
            ))
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { reminders, tz })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::create_reminder_command;
    use crate::test_support::{context_at, local};

    #[actix_web::test]
    async fn lists_reminders_of_the_requested_range() {
        // Monday 2025-03-10 10:00 local
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));
        ctx.repos
            .chat_settings
            .upsert_timezone(1, "UTC+3")
            .await
            .unwrap();
        for text in [
            "today 18:00 gym",
            "tomorrow 08:00 dentist",
            "sunday 12:00 brunch",
            "2025-04-01 10:00 taxes",
        ] {
            create_reminder_command(&ctx, 1, text).await;
        }

        let today = list_upcoming_command(&ctx, 1, "").await;
        assert_eq!(today, "• Mon, 10 Mar 18:00 — gym");

        let week = list_upcoming_command(&ctx, 1, "week").await;
        assert_eq!(
            week,
            "• Mon, 10 Mar 18:00 — gym\n• Tue, 11 Mar 08:00 — dentist\n• Sun, 16 Mar 12:00 — brunch"
        );

        let all = list_upcoming_command(&ctx, 1, "ALL").await;
        assert_eq!(all.lines().count(), 4);
        assert!(all.ends_with("• Tue, 01 Apr 10:00 — taxes"));
    }

    #[actix_web::test]
    async fn empty_and_invalid_ranges() {
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));
        assert_eq!(
            list_upcoming_command(&ctx, 1, "today").await,
            "Nothing scheduled in that range."
        );
        assert_eq!(list_upcoming_command(&ctx, 1, "month").await, LIST_USAGE);
    }
}
