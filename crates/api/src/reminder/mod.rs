pub mod create_reminder;
pub mod list_upcoming;
pub mod send_daily_digests;
pub mod send_due_reminders;
