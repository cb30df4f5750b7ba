use crate::reminder::{
    send_daily_digests::SendDailyDigestsUseCase, send_due_reminders::SendDueRemindersUseCase,
};
use crate::shared::usecase::execute;
use std::sync::Arc;
use std::time::Duration;
use tickler_domain::DigestLedger;
use tickler_infra::BotContext;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Runs the due-job pass every `jobs_interval`, starting at the next full
/// minute
pub fn start_send_due_reminders_job(ctx: BotContext, token: CancellationToken) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.now().timestamp_millis().max(0);
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        let mut ticks = interval_at(start, ctx.config.jobs_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticks.tick() => {
                    if let Ok(res) = execute(SendDueRemindersUseCase {}, &ctx).await {
                        if res.sent + res.failed > 0 {
                            info!(
                                sent = res.sent,
                                failed = res.failed,
                                rearmed = res.rearmed,
                                "Due reminders dispatched"
                            );
                        }
                    }
                }
            }
        }
        info!("Due reminders job stopped");
    });
}

/// Runs the digest pass every `digest_interval`
pub fn start_send_daily_digests_job(ctx: BotContext, token: CancellationToken) {
    actix_web::rt::spawn(async move {
        let ledger = Arc::new(DigestLedger::new());

        let mut ticks = interval_at(Instant::now(), ctx.config.digest_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticks.tick() => {
                    let usecase = SendDailyDigestsUseCase {
                        ledger: ledger.clone(),
                    };
                    if let Ok(res) = execute(usecase, &ctx).await {
                        if res.failed > 0 {
                            warn!(
                                sent = res.sent,
                                failed = res.failed,
                                "Some daily digests could not be sent"
                            );
                        }
                    }
                }
            }
        }
        info!("Daily digests job stopped");
    });
}
