mod clear_timetable;
mod get_timetable;
mod set_timetable;

use clear_timetable::clear_timetable_command;
use get_timetable::get_timetable_command;
use set_timetable::set_timetable_command;
use tickler_infra::BotContext;

pub const TIMETABLE_USAGE: &str = "Usage:\n/timetable show\n/timetable clear\n/timetable set mon 10-18 Work; wed 19:00 English";

/// `/timetable show|clear|set <entries>`
pub async fn timetable_command(ctx: &BotContext, chat_id: i64, args: &str) -> String {
    let args = args.trim();
    let (sub, rest) = args
        .split_once(char::is_whitespace)
        .unwrap_or((args, ""));

    match sub.to_lowercase().as_str() {
        "show" => get_timetable_command(ctx, chat_id).await,
        "clear" => clear_timetable_command(ctx, chat_id).await,
        "set" => set_timetable_command(ctx, chat_id, rest).await,
        _ => TIMETABLE_USAGE.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{context_at, local};

    #[actix_web::test]
    async fn set_show_and_clear() {
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));

        assert_eq!(
            timetable_command(&ctx, 1, "show").await,
            "Your timetable is empty."
        );

        let reply = timetable_command(&ctx, 1, "set wed 19:00 English; mon 10-18 Work").await;
        assert_eq!(reply, "Timetable saved: 2 entries.");
        assert_eq!(
            timetable_command(&ctx, 1, "SHOW").await,
            "Monday:\n  10:00–18:00 — Work\nWednesday:\n  19:00 — English"
        );

        // Replaces everything
        timetable_command(&ctx, 1, "set fri 9 Gym").await;
        assert_eq!(
            timetable_command(&ctx, 1, "show").await,
            "Friday:\n  09:00 — Gym"
        );

        assert_eq!(timetable_command(&ctx, 1, "clear").await, "Timetable cleared.");
        assert_eq!(
            timetable_command(&ctx, 1, "show").await,
            "Your timetable is empty."
        );
    }

    #[actix_web::test]
    async fn invalid_input_keeps_timetable() {
        let (ctx, _, _) = context_at(local(2025, 3, 10, 10, 0));
        timetable_command(&ctx, 1, "set mon 10-18 Work").await;

        let reply = timetable_command(&ctx, 1, "set moon 10 Work").await;
        assert_eq!(
            reply,
            format!("Unknown weekday: moon\n\n{}", TIMETABLE_USAGE)
        );
        assert_eq!(timetable_command(&ctx, 1, "set").await, TIMETABLE_USAGE);
        assert_eq!(timetable_command(&ctx, 1, "").await, TIMETABLE_USAGE);
        assert_eq!(timetable_command(&ctx, 1, "dance").await, TIMETABLE_USAGE);

        assert_eq!(
            ctx.repos.timetable.find_by_chat(1).await.unwrap().len(),
            1
        );
    }
}
