use crate::shared::usecase::UseCase;
use std::sync::Arc;
use tickler_domain::{digest_window, render_digest, DigestLedger, DIGEST_LIMIT};
use tickler_infra::BotContext;
use tracing::{debug, error, info};

/// Sends each chat with an enabled digest the reminders of its next local
/// day, once per local calendar day.
#[derive(Debug)]
pub struct SendDailyDigestsUseCase {
    pub ledger: Arc<DigestLedger>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[derive(Debug, Default, PartialEq)]
pub struct UseCaseRes {
    pub sent: usize,
    pub failed: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDailyDigestsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDailyDigests";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let slots = ctx
            .storage(ctx.repos.chat_settings.find_with_active_digest())
            .await
            .map_err(|e| {
                error!(error = %e, "Unable to fetch chats with an active digest");
                UseCaseError::StorageError
            })?;

        let mut res = UseCaseRes::default();
        for slot in slots {
            let tz = slot.zone();
            let local_now = tz.local(&now);
            if !slot.is_due(&local_now) {
                continue;
            }
            let local_date = local_now.date();
            if !self.ledger.claim(slot.chat_id, local_date) {
                debug!(chat_id = slot.chat_id, "Digest was already sent today");
                continue;
            }

            let (from, to) = digest_window(&tz, now);
            let reminders = match ctx
                .storage(ctx.repos.reminders.find_upcoming(
                    slot.chat_id,
                    from,
                    Some(to),
                    DIGEST_LIMIT as i64,
                ))
                .await
            {
                Ok(reminders) => reminders,
                Err(e) => {
                    error!(chat_id = slot.chat_id, error = %e, "Unable to fetch reminders for digest");
                    self.ledger.release(slot.chat_id, local_date);
                    res.failed += 1;
                    continue;
                }
            };

            match ctx.send(slot.chat_id, &render_digest(&reminders, &tz)).await {
                Ok(()) => {
                    info!(chat_id = slot.chat_id, items = reminders.len(), "Digest sent");
                    res.sent += 1;
                }
                Err(e) => {
                    error!(chat_id = slot.chat_id, error = %e, "Unable to send digest");
                    self.ledger.release(slot.chat_id, local_date);
                    res.failed += 1;
                }
            }
        }

        Ok(res)
    }
}
