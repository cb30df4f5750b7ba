use crate::date::parse_clock_time;
use crate::parser::{weekday_display_name, weekday_from_word};
use chrono::{NaiveTime, Weekday};
use thiserror::Error;

/// One line of a chat's static weekly timetable
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyScheduleEntry {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
    pub title: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum TimetableParseError {
    #[error("Expected `<weekday> <time> <title>`, got: {0}")]
    BadSegment(String),
    #[error("Unknown weekday: {0}")]
    BadWeekday(String),
    #[error("Invalid time: {0}")]
    BadTime(String),
}

/// Parses `;` separated entries such as `mon 10-18 Work; wed 19:00 English`.
/// Empty segments are skipped. Any malformed segment fails the whole input.
pub fn parse_timetable(raw: &str) -> Result<Vec<WeeklyScheduleEntry>, TimetableParseError> {
    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Result<WeeklyScheduleEntry, TimetableParseError> {
    let fields = segment.split_whitespace().collect::<Vec<_>>();
    if fields.len() < 3 {
        return Err(TimetableParseError::BadSegment(segment.to_string()));
    }

    let weekday = weekday_from_word(fields[0].trim_matches(|c: char| c == '.' || c == ','))
        .ok_or_else(|| TimetableParseError::BadWeekday(fields[0].to_string()))?;
    let (start, end) = parse_time_range(fields[1])?;

    Ok(WeeklyScheduleEntry {
        weekday,
        start,
        end,
        title: fields[2..].join(" "),
    })
}

fn parse_time_range(s: &str) -> Result<(NaiveTime, Option<NaiveTime>), TimetableParseError> {
    let s = s.replace('–', "-");
    match s.split_once('-') {
        Some((start, end)) => Ok((parse_hour_or_time(start)?, Some(parse_hour_or_time(end)?))),
        None => Ok((parse_hour_or_time(&s)?, None)),
    }
}

/// `HH` or `HH:MM`
fn parse_hour_or_time(s: &str) -> Result<NaiveTime, TimetableParseError> {
    let s = s.trim();
    let bad_time = || TimetableParseError::BadTime(s.to_string());
    if s.contains(':') {
        return parse_clock_time(s).ok_or_else(bad_time);
    }
    let hour = s.parse::<u32>().map_err(|_| bad_time())?;
    NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(bad_time)
}

/// Entries grouped by weekday, Monday first. The entries are expected to be
/// ordered by weekday then start time.
pub fn render_timetable(entries: &[WeeklyScheduleEntry]) -> String {
    let mut out = String::new();
    let mut current = None;
    for entry in entries {
        if current != Some(entry.weekday) {
            current = Some(entry.weekday);
            out.push_str(weekday_display_name(entry.weekday));
            out.push_str(":\n");
        }
        let end = entry
            .end
            .map(|end| format!("–{}", end.format("%H:%M")))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}{} — {}\n",
            entry.start.format("%H:%M"),
            end,
            entry.title
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_entries() {
        let entries = parse_timetable("mon 10-18 Work; Wed 19:00 English class;; fri. 9:30–11 Gym").unwrap();
        assert_eq!(
            entries,
            vec![
                WeeklyScheduleEntry {
                    weekday: Weekday::Mon,
                    start: t(10, 0),
                    end: Some(t(18, 0)),
                    title: "Work".into(),
                },
                WeeklyScheduleEntry {
                    weekday: Weekday::Wed,
                    start: t(19, 0),
                    end: None,
                    title: "English class".into(),
                },
                WeeklyScheduleEntry {
                    weekday: Weekday::Fri,
                    start: t(9, 30),
                    end: Some(t(11, 0)),
                    title: "Gym".into(),
                },
            ]
        );
    }

    #[test]
    fn full_weekday_names() {
        let entries = parse_timetable("Thursday 7 Run").unwrap();
        assert_eq!(entries[0].weekday, Weekday::Thu);
        assert_eq!(entries[0].start, t(7, 0));
    }

    #[test]
    fn rejects_malformed_segments() {
        assert_eq!(
            parse_timetable("mon 10-18"),
            Err(TimetableParseError::BadSegment("mon 10-18".into()))
        );
        assert_eq!(
            parse_timetable("moon 10 Work"),
            Err(TimetableParseError::BadWeekday("moon".into()))
        );
        assert_eq!(
            parse_timetable("mon 25 Work"),
            Err(TimetableParseError::BadTime("25".into()))
        );
        assert!(parse_timetable("mon 10-xx Work").is_err());
        assert!(parse_timetable("mon 10 Work; tue").is_err());
    }

    #[test]
    fn empty_input_is_empty_timetable() {
        assert_eq!(parse_timetable(" ; "), Ok(vec![]));
    }

    #[test]
    fn renders_grouped_by_weekday() {
        let entries = parse_timetable("mon 10-18 Work; mon 19:00 Gym; wed 19:00 English").unwrap();
        assert_eq!(
            render_timetable(&entries),
            "Monday:\n  10:00–18:00 — Work\n  19:00 — Gym\nWednesday:\n  19:00 — English\n"
        );
    }
}
