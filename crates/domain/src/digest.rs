use crate::date::{format_local, local_days_window};
use crate::reminder::Reminder;
use crate::timezone::ChatTimezone;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Most reminders listed in one digest
pub const DIGEST_LIMIT: usize = 50;

/// Remembers the local date each chat last received its digest on.
///
/// The lock is only held for the check-then-set in `claim` and for
/// `release`, never while talking to storage or the chat transport.
#[derive(Debug, Default)]
pub struct DigestLedger {
    sent_on: Mutex<HashMap<i64, NaiveDate>>,
}

impl DigestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the digest of `chat_id` for `local_date`. Returns `false` when
    /// it was already claimed for that date.
    pub fn claim(&self, chat_id: i64, local_date: NaiveDate) -> bool {
        let mut sent_on = self
            .sent_on
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if sent_on.get(&chat_id) == Some(&local_date) {
            return false;
        }
        sent_on.insert(chat_id, local_date);
        true
    }

    /// Gives a claim back so that the next trigger may retry
    pub fn release(&self, chat_id: i64, local_date: NaiveDate) {
        let mut sent_on = self
            .sent_on
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if sent_on.get(&chat_id) == Some(&local_date) {
            sent_on.remove(&chat_id);
        }
    }
}

/// The next local day of the chat: `[midnight(today + 1), midnight(today + 2))`
pub fn digest_window(tz: &ChatTimezone, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tomorrow = tz.local(&now).date() + Duration::days(1);
    local_days_window(tz, tomorrow, 1)
}

/// One `• {local time} — {title}` line per reminder
pub fn render_reminder_lines(reminders: &[Reminder], tz: &ChatTimezone) -> String {
    reminders
        .iter()
        .map(|reminder| {
            let when = reminder
                .schedule
                .effective_time()
                .map(|at| format_local(tz, &at))
                .unwrap_or_else(|| "—".to_string());
            format!("• {} — {}", when, reminder.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_digest(reminders: &[Reminder], tz: &ChatTimezone) -> String {
    if reminders.is_empty() {
        return "Tomorrow: nothing scheduled.".to_string();
    }
    format!("Tomorrow:\n{}", render_reminder_lines(reminders, tz))
}
