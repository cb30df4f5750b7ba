use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Display;
use tracing::debug;

/// The timezone a chat lives in.
///
/// Users either give an IANA name like `Europe/Moscow` or a fixed offset
/// like `UTC+3`. Every conversion between the chat's wall-clock and absolute
/// time goes through this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChatTimezone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl ChatTimezone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Resolves a user supplied timezone. Tries the `UTC[±HH[:MM]]` notation
    /// first, then the IANA database, and finally falls back to UTC.
    pub fn resolve(name: &str) -> Self {
        if let Some(offset) = parse_fixed_offset(name) {
            return Self::Fixed(offset);
        }
        if let Ok(tz) = name.trim().parse::<Tz>() {
            return Self::Named(tz);
        }
        debug!(timezone = name, "Unknown timezone, falling back to UTC");
        Self::utc()
    }

    /// Wall-clock time of `instant` in this timezone
    pub fn local(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Fixed(offset) => instant.with_timezone(offset).naive_local(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Absolute instant of a wall-clock time in this timezone.
    ///
    /// Ambiguous wall-clock times (DST fall back) resolve to the earliest
    /// instant. Wall-clock times inside a DST gap are shifted forward by the
    /// length of the gap.
    pub fn to_utc(&self, local: &NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Fixed(offset) => local_to_utc(offset, local),
            Self::Named(tz) => local_to_utc(tz, local),
        }
    }

    pub fn offset_minutes(&self, instant: &DateTime<Utc>) -> i32 {
        let offset = match self {
            Self::Fixed(offset) => *offset,
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        };
        offset.local_minus_utc() / 60
    }
}

impl Default for ChatTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl Display for ChatTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                write!(f, "UTC{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }
}

fn local_to_utc<T: TimeZone>(zone: &T, local: &NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = zone.from_local_datetime(local).earliest() {
        return dt.with_timezone(&Utc);
    }
    // Inside a gap: interpret the wall-clock with the offset in effect before it
    let before = zone
        .offset_from_utc_datetime(&(*local - Duration::days(1)))
        .fix();
    let utc = *local - Duration::seconds(before.local_minus_utc() as i64);
    Utc.from_utc_datetime(&utc)
}

/// Parses `UTC`, `UTCZ`, `UTC+3`, `utc-04:30` and friends
fn parse_fixed_offset(name: &str) -> Option<FixedOffset> {
    let name = name.trim().to_uppercase();
    let rest = name.strip_prefix("UTC")?;
    if matches!(rest, "" | "Z" | "+0" | "+00:00") {
        return Some(Utc.fix());
    }

    let (sign, rest) = if let Some(rest) = rest.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = rest.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };

    let mut parts = rest.splitn(2, ':');
    let hours = parse_digits(parts.next()?)?;
    let minutes = match parts.next() {
        Some(minutes) => parse_digits(minutes)?,
        None => 0,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_digits(s: &str) -> Option<i32> {
    if s.is_empty() || s.len() > 2 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
