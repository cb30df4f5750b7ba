use super::vocabulary::{month_from_word, weekday_from_name};
use super::Trigger;
use crate::recurrence::WeeklyRule;
use crate::timezone::ChatTimezone;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// What a recognizer found: the trigger and the parts of the text that
/// expressed it and must not end up in the title.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognized {
    pub trigger: Trigger,
    pub spans: Vec<Range<usize>>,
}

pub type RecognizerFn = fn(&str, &ChatTimezone, DateTime<Utc>) -> Option<Recognized>;

/// The cascade, in priority order. The first recognizer that matches wins.
pub const RECOGNIZERS: &[(&str, RecognizerFn)] = &[
    ("relative_day", relative_day),
    ("named_month", named_month),
    ("iso", iso),
    ("weekday", weekday),
];

static RELATIVE_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(today|tomorrow|day[\s-]+after[\s-]+tomorrow)\b(?:[^0-9]{0,10}(\d{1,2})[:.](\d{2}))?",
    )
    .expect("valid regex")
});

static NAMED_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:on|in)\s+)?(\d{1,2})\s+([a-z]+)\s*,?\s*(?:at\s+)?(\d{1,2})[:.](\d{2})")
        .expect("valid regex")
});

static ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\s+(\d{1,2})[:.](\d{2})").expect("valid regex")
});

static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(every|each)\s+)?(?:on\s+)?((?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?)\b(?:[^0-9]{0,10}(\d{1,2})[:.](\d{2}))?",
    )
    .expect("valid regex")
});

fn number<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Clock time in groups `hour` and `hour + 1`, or the default when the
/// optional time group did not participate.
fn optional_time(caps: &Captures, hour: usize) -> Option<NaiveTime> {
    if caps.get(hour).is_none() {
        return NaiveTime::from_hms_opt(9, 0, 0);
    }
    NaiveTime::from_hms_opt(number(caps, hour)?, number(caps, hour + 1)?, 0)
}

/// Spans to cut for a keyword optionally followed by a clock time a few
/// characters later. The text between them stays in the title unless it is
/// just filler like `at` or a comma.
fn keyword_and_time_spans(
    text: &str,
    keyword: Range<usize>,
    caps: &Captures,
    hour: usize,
) -> Vec<Range<usize>> {
    let (time_start, time_end) = match (caps.get(hour), caps.get(hour + 1)) {
        (Some(h), Some(m)) => (h.start(), m.end()),
        _ => return vec![keyword],
    };
    let gap = text[keyword.end..time_start]
        .trim_matches(|c: char| c.is_whitespace() || c == ',')
        .to_lowercase();
    if gap.is_empty() || gap == "at" {
        vec![keyword.start..time_end]
    } else {
        vec![keyword, time_start..time_end]
    }
}

fn relative_day(text: &str, tz: &ChatTimezone, now: DateTime<Utc>) -> Option<Recognized> {
    let caps = RELATIVE_DAY.captures(text)?;
    let keyword = caps.get(1)?;
    let offset_days = match keyword.as_str().to_lowercase().as_str() {
        "today" => 0,
        "tomorrow" => 1,
        _ => 2,
    };
    let time = optional_time(&caps, 2)?;

    let today = tz.local(&now).date();
    let mut date = today + Duration::days(offset_days);
    let mut due = tz.to_utc(&date.and_time(time));
    if due <= now {
        date = date.succ_opt()?;
        due = tz.to_utc(&date.and_time(time));
    }

    Some(Recognized {
        trigger: Trigger::Once(due),
        spans: keyword_and_time_spans(text, keyword.range(), &caps, 2),
    })
}

fn named_month(text: &str, tz: &ChatTimezone, now: DateTime<Utc>) -> Option<Recognized> {
    let year = tz.local(&now).year();
    NAMED_MONTH.captures_iter(text).find_map(|caps| {
        let month = month_from_word(caps.get(2)?.as_str())?;
        let date = NaiveDate::from_ymd_opt(year, month, number(&caps, 1)?)?;
        let time = NaiveTime::from_hms_opt(number(&caps, 3)?, number(&caps, 4)?, 0)?;
        Some(Recognized {
            trigger: Trigger::Once(tz.to_utc(&date.and_time(time))),
            spans: vec![caps.get(0)?.range()],
        })
    })
}

fn iso(text: &str, tz: &ChatTimezone, _now: DateTime<Utc>) -> Option<Recognized> {
    ISO.captures_iter(text).find_map(|caps| {
        let date = NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)?;
        let time = NaiveTime::from_hms_opt(number(&caps, 4)?, number(&caps, 5)?, 0)?;
        Some(Recognized {
            trigger: Trigger::Once(tz.to_utc(&date.and_time(time))),
            spans: vec![caps.get(0)?.range()],
        })
    })
}

fn weekday(text: &str, tz: &ChatTimezone, now: DateTime<Utc>) -> Option<Recognized> {
    let caps = WEEKDAY.captures(text)?;
    let name = caps.get(2)?.as_str().to_lowercase();
    let day = weekday_from_name(name.strip_suffix('s').unwrap_or(name.as_str()))?;
    let time = optional_time(&caps, 3)?;
    let keyword = caps.get(0)?.start()..caps.get(2)?.end();
    let spans = keyword_and_time_spans(text, keyword, &caps, 3);

    if caps.get(1).is_some() {
        let rule = WeeklyRule::new(day, time.hour(), time.minute())?;
        return Some(Recognized {
            trigger: Trigger::Weekly(rule),
            spans,
        });
    }

    let today = tz.local(&now).date();
    let date = (0..7)
        .map(|offset| today + Duration::days(offset))
        .find(|date| date.weekday() == day)?;
    let mut due = tz.to_utc(&date.and_time(time));
    if due <= now {
        due = tz.to_utc(&(date + Duration::days(7)).and_time(time));
    }

    Some(Recognized {
        trigger: Trigger::Once(due),
        spans,
    })
}
