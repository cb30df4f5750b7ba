use crate::timezone::ChatTimezone;
use chrono::prelude::*;
use chrono::Duration;
use std::str::FromStr;

/// Absolute instant of local midnight at the start of `date`
pub fn local_midnight(tz: &ChatTimezone, date: NaiveDate) -> DateTime<Utc> {
    tz.to_utc(&date.and_time(NaiveTime::MIN))
}

/// `[midnight(date), midnight(date + days))` of the chat's local calendar
pub fn local_days_window(
    tz: &ChatTimezone,
    date: NaiveDate,
    days: i64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        local_midnight(tz, date),
        local_midnight(tz, date + Duration::days(days)),
    )
}

/// Renders an instant like `Tue, 11 Mar 18:00` in the chat's wall-clock
pub fn format_local(tz: &ChatTimezone, instant: &DateTime<Utc>) -> String {
    tz.local(instant).format("%a, %d %b %H:%M").to_string()
}

/// Parses a wall-clock time of day: `HH:MM` or `H:MM`
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let (hour, minute) = s.trim().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// The ranges `/list` understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRange {
    /// The current local calendar day
    Today,
    /// The current local week, starting Monday
    Week,
    /// Everything from now on
    All,
}

impl ListRange {
    /// Lower bound and optional upper bound of the range in absolute time
    pub fn window(
        &self,
        tz: &ChatTimezone,
        now: DateTime<Utc>,
    ) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
        let today = tz.local(&now).date();
        match self {
            Self::Today => {
                let (from, to) = local_days_window(tz, today, 1);
                (from, Some(to))
            }
            Self::Week => {
                let monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                let (from, to) = local_days_window(tz, monday, 7);
                (from, Some(to))
            }
            Self::All => (now, None),
        }
    }
}

impl FromStr for ListRange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "all" => Ok(Self::All),
            _ => Err(()),
        }
    }
}
