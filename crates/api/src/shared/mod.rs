pub mod usecase;

use tickler_domain::ChatTimezone;
use tickler_infra::BotContext;

/// Timezone of the chat, UTC for chats without settings
pub async fn chat_timezone(ctx: &BotContext, chat_id: i64) -> anyhow::Result<ChatTimezone> {
    let settings = ctx.storage(ctx.repos.chat_settings.find(chat_id)).await?;
    Ok(settings.map(|s| s.zone()).unwrap_or_default())
}
