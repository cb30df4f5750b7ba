use crate::shared::{
    chat_timezone,
    usecase::{execute, UseCase},
};
use crate::updates::STORAGE_FAILURE_REPLY;
use chrono::{DateTime, Utc};
use tickler_domain::{
    date::format_local,
    parse,
    parser::weekday_display_name,
    ChatTimezone, NewReminder, ParseError, Reminder, ReminderSchedule,
};
use tickler_infra::BotContext;

pub const CREATE_REMINDER_EXAMPLE: &str = "I could not find a date or time in that message. Try something like:\n\
     tomorrow 18:00 dentist\n\
     every monday 09:00 standup\n\
     12 march at 10:30 call mom in 15 minutes";

/// Handles free text: stores a reminder when the text names a time
pub async fn create_reminder_command(ctx: &BotContext, chat_id: i64, text: &str) -> String {
    let usecase = CreateReminderFromTextUseCase {
        chat_id,
        text: text.to_string(),
    };

    match execute(usecase, ctx).await {
        Ok(res) => confirmation(&res.reminder, &res.tz),
        Err(UseCaseError::Parse(_)) => CREATE_REMINDER_EXAMPLE.to_string(),
        Err(UseCaseError::StorageError) => STORAGE_FAILURE_REPLY.to_string(),
    }
}

fn confirmation(reminder: &Reminder, tz: &ChatTimezone) -> String {
    let lead = if reminder.lead_minutes > 0 {
        format!(" I will remind you {} min before.", reminder.lead_minutes)
    } else {
        String::new()
    };
    match &reminder.schedule {
        ReminderSchedule::Once { due } => format!(
            "✅ Saved: {} on {}.{}",
            reminder.message,
            format_local(tz, due),
            lead
        ),
        ReminderSchedule::Weekly {
            rule,
            next_occurrence,
        } => {
            let next = next_occurrence
                .map(|next| format!(" Next: {}.", format_local(tz, &next)))
                .unwrap_or_default();
            format!(
                "✅ Saved: {} every {} at {}.{}{}",
                reminder.message,
                weekday_display_name(rule.weekday()),
                rule.time().format("%H:%M"),
                next,
                lead
            )
        }
    }
}

#[derive(Debug)]
pub struct CreateReminderFromTextUseCase {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    Parse(ParseError),
    StorageError,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
    pub tz: ChatTimezone,
}

impl CreateReminderFromTextUseCase {
    async fn store(
        &self,
        ctx: &BotContext,
        reminder: NewReminder,
        now: DateTime<Utc>,
    ) -> Result<Reminder, UseCaseError> {
        let reminder_id = ctx
            .storage(ctx.repos.reminders.insert(&reminder))
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if let Some(report_at) = reminder.first_report_at() {
            ctx.storage(ctx.repos.jobs.insert(reminder_id, report_at))
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(Reminder {
            id: reminder_id,
            chat_id: reminder.chat_id,
            message: reminder.message,
            lead_minutes: reminder.lead_minutes,
            schedule: reminder.schedule,
            created_at: now,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderFromTextUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminderFromText";

    async fn execute(&mut self, ctx: &BotContext) -> Result<Self::Response, Self::Error> {
        let tz = chat_timezone(ctx, self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let now = ctx.sys.now();

        let intent = parse(&self.text, &tz, now).map_err(UseCaseError::Parse)?;
        let reminder = NewReminder::from_intent(self.chat_id, intent, &tz, now);
        let reminder = self.store(ctx, reminder, now).await?;

        Ok(UseCaseRes { reminder, tz })
    }
}
