use crate::parser::{ParsedIntent, Trigger};
use crate::recurrence::WeeklyRule;
use crate::shared::entity::Entity;
use crate::timezone::ChatTimezone;
use chrono::{DateTime, Duration, Utc};
use std::cmp::max;

/// When a `Reminder` fires. A reminder is either one-off or weekly, never
/// both and never neither.
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderSchedule {
    Once {
        due: DateTime<Utc>,
    },
    Weekly {
        rule: WeeklyRule,
        /// The upcoming occurrence, advanced every time the reminder fires
        next_occurrence: Option<DateTime<Utc>>,
    },
}

impl ReminderSchedule {
    /// The instant the reminder is about, `next_occurrence` for weekly ones
    pub fn effective_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Once { due } => Some(*due),
            Self::Weekly {
                next_occurrence, ..
            } => *next_occurrence,
        }
    }

    pub fn weekly_rule(&self) -> Option<WeeklyRule> {
        match self {
            Self::Once { .. } => None,
            Self::Weekly { rule, .. } => Some(*rule),
        }
    }
}

/// A `Reminder` is something a chat asked to be notified about, either
/// once or every week.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: i64,
    /// The chat that created the `Reminder` and receives its notifications
    pub chat_id: i64,
    pub message: String,
    /// The notification is sent this many minutes before the effective time
    pub lead_minutes: i64,
    pub schedule: ReminderSchedule,
    pub created_at: DateTime<Utc>,
}

impl Entity for Reminder {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A `Reminder` that is not stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub chat_id: i64,
    pub message: String,
    pub lead_minutes: i64,
    pub schedule: ReminderSchedule,
    pub created_at: DateTime<Utc>,
}

impl NewReminder {
    /// Weekly intents get their first occurrence computed from `now`
    pub fn from_intent(
        chat_id: i64,
        intent: ParsedIntent,
        tz: &ChatTimezone,
        now: DateTime<Utc>,
    ) -> Self {
        let schedule = match intent.trigger {
            Trigger::Once(due) => ReminderSchedule::Once { due },
            Trigger::Weekly(rule) => ReminderSchedule::Weekly {
                rule,
                next_occurrence: Some(rule.next_occurrence(tz, now)),
            },
        };
        Self {
            chat_id,
            message: intent.title,
            lead_minutes: intent.lead_minutes,
            schedule,
            created_at: now,
        }
    }

    /// When the first notification should go out
    pub fn first_report_at(&self) -> Option<DateTime<Utc>> {
        self.schedule
            .effective_time()
            .map(|at| report_time(at, self.lead_minutes))
    }
}

/// `at` moved `lead_minutes` earlier
pub fn report_time(at: DateTime<Utc>, lead_minutes: i64) -> DateTime<Utc> {
    at - Duration::minutes(lead_minutes)
}

/// A single pending or sent notification of a `Reminder`.
///
/// There is at most one `Job` per `(reminder_id, report_at)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: i64,
    pub reminder_id: i64,
    pub report_at: DateTime<Utc>,
    /// `None` while the job is pending
    pub sent_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_pending(&self) -> bool {
        self.sent_at.is_none()
    }
}

impl Entity for Job {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A pending `Job` whose report time has come, joined with what is needed
/// to notify the chat and to re-arm weekly reminders.
#[derive(Debug, Clone, PartialEq)]
pub struct DueJob {
    pub job_id: i64,
    pub reminder_id: i64,
    pub report_at: DateTime<Utc>,
    pub chat_id: i64,
    pub message: String,
    pub lead_minutes: i64,
    pub weekly_rule: Option<WeeklyRule>,
}

/// The next firing of a weekly reminder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rearm {
    pub next_occurrence: DateTime<Utc>,
    pub report_at: DateTime<Utc>,
}

impl DueJob {
    pub fn notification_text(&self) -> String {
        if self.lead_minutes > 0 {
            format!("⏰ Reminder: {} (in {} min)", self.message, self.lead_minutes)
        } else {
            format!("⏰ Reminder: {}", self.message)
        }
    }

    /// For weekly reminders, the occurrence after the one this job announced.
    ///
    /// Counted from the announced occurrence, or from `now` when the job is
    /// dispatched late, so a late pass never schedules into the past.
    pub fn rearm(&self, tz: &ChatTimezone, now: DateTime<Utc>) -> Option<Rearm> {
        let rule = self.weekly_rule?;
        let fired = self.report_at + Duration::minutes(self.lead_minutes);
        let next_occurrence = rule.next_occurrence(tz, max(fired, now));
        Some(Rearm {
            next_occurrence,
            report_at: report_time(next_occurrence, self.lead_minutes),
        })
    }
}
