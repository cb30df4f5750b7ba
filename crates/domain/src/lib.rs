mod chat;
pub mod date;
mod digest;
pub mod parser;
mod recurrence;
mod reminder;
mod shared;
mod timetable;
mod timezone;

pub use chat::{ChatDigestSlot, ChatSettings, DEFAULT_TIMEZONE};
pub use digest::{
    digest_window, render_digest, render_reminder_lines, DigestLedger, DIGEST_LIMIT,
};
pub use parser::{parse, ParseError, ParsedIntent, Trigger};
pub use recurrence::{InvalidWeeklyRuleError, WeeklyRule};
pub use reminder::{report_time, DueJob, Job, NewReminder, Rearm, Reminder, ReminderSchedule};
pub use shared::entity::Entity;
pub use timetable::{parse_timetable, render_timetable, TimetableParseError, WeeklyScheduleEntry};
pub use timezone::ChatTimezone;
