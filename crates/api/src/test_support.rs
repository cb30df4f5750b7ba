use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tickler_domain::ChatTimezone;
use tickler_infra::{BotContext, InMemoryMessenger, StaticSys};

/// In-memory context with a clock frozen at `now` and a recording messenger
pub fn context_at(now: DateTime<Utc>) -> (BotContext, Arc<StaticSys>, Arc<InMemoryMessenger>) {
    let clock = Arc::new(StaticSys::new(now));
    let messenger = Arc::new(InMemoryMessenger::new());
    let mut ctx = BotContext::create_inmemory();
    ctx.sys = clock.clone();
    ctx.messenger = messenger.clone();
    (ctx, clock, messenger)
}

/// Wall-clock time in UTC+3, the zone most tests put their chats in
pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    let tz = ChatTimezone::resolve("UTC+3");
    let naive = Utc
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
        .naive_utc();
    tz.to_utc(&naive)
}
