use crate::timezone::ChatTimezone;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};
use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Fires every week on `weekday` at `hour`:`minute` wall-clock time of the
/// chat's timezone.
///
/// Stored in its textual form, e.g. `FREQ=WEEKLY;BYDAY=MO;BYHOUR=9;BYMINUTE=0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRule {
    weekday: Weekday,
    time: NaiveTime,
}

impl WeeklyRule {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self { weekday, time })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// The first occurrence strictly after `from`.
    ///
    /// Scans forward day by day in local time. The result is at most one
    /// local week away from `from`.
    pub fn next_occurrence(&self, tz: &ChatTimezone, from: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = tz.local(&from).date();
        for _ in 0..8 {
            if date.weekday() == self.weekday {
                let candidate = tz.to_utc(&date.and_time(self.time()));
                if candidate > from {
                    return candidate;
                }
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        from + Duration::days(7)
    }
}

impl Display for WeeklyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FREQ=WEEKLY;BYDAY={};BYHOUR={};BYMINUTE={}",
            weekday_to_str(self.weekday),
            self.hour(),
            self.minute()
        )
    }
}

fn str_to_weekday(d: &str) -> Result<Weekday, InvalidWeeklyRuleError> {
    match d.to_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(InvalidWeeklyRuleError::InvalidWeekday(d.to_string())),
    }
}

fn weekday_to_str(wday: Weekday) -> &'static str {
    match wday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidWeeklyRuleError {
    #[error("Invalid weekday specified: {0}")]
    InvalidWeekday(String),
    #[error("Only weekly rules are supported, got frequency: {0}")]
    UnsupportedFrequency(String),
    #[error("Malformed weekly rule: {0}")]
    Malformed(String),
}

impl FromStr for WeeklyRule {
    type Err = InvalidWeeklyRuleError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidWeeklyRuleError::Malformed(rule.to_string());

        let mut freq = None;
        let mut weekday = None;
        let mut hour = None;
        let mut minute = None;
        for part in rule.trim().split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(malformed)?;
            match key.trim().to_uppercase().as_str() {
                "FREQ" => freq = Some(value.trim().to_uppercase()),
                "BYDAY" => weekday = Some(str_to_weekday(value.trim())?),
                "BYHOUR" => hour = Some(value.trim().parse::<u32>().map_err(|_| malformed())?),
                "BYMINUTE" => minute = Some(value.trim().parse::<u32>().map_err(|_| malformed())?),
                _ => return Err(malformed()),
            }
        }

        match freq {
            Some(f) if f == "WEEKLY" => (),
            Some(f) => return Err(InvalidWeeklyRuleError::UnsupportedFrequency(f)),
            None => return Err(malformed()),
        }

        WeeklyRule::new(
            weekday.ok_or_else(malformed)?,
            hour.ok_or_else(malformed)?,
            minute.unwrap_or(0),
        )
        .ok_or_else(malformed)
    }
}

impl Serialize for WeeklyRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WeeklyRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct WeeklyRuleVisitor;

        impl<'de> Visitor<'de> for WeeklyRuleVisitor {
            type Value = WeeklyRule;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A valid string representation of a weekly rule")
            }

            fn visit_str<E>(self, value: &str) -> Result<WeeklyRule, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<WeeklyRule>()
                    .map_err(|_| E::custom(format!("Malformed weekly rule: {}", value)))
            }
        }

        deserializer.deserialize_str(WeeklyRuleVisitor)
    }
}
