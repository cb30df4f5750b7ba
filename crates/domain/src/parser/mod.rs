mod lead_time;
mod recognizers;
mod vocabulary;

pub use lead_time::DEFAULT_LEAD_MINUTES;
pub use vocabulary::{weekday_display_name, weekday_from_word};

use crate::recurrence::WeeklyRule;
use crate::timezone::ChatTimezone;
use chrono::{DateTime, Utc};
use recognizers::RECOGNIZERS;
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

/// Title used when nothing but the date and time was given
pub const DEFAULT_TITLE: &str = "task";

/// When a reminder should fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    Once(DateTime<Utc>),
    Weekly(WeeklyRule),
}

/// The outcome of reading a free-form reminder request
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIntent {
    pub title: String,
    pub trigger: Trigger,
    /// How many minutes before the trigger the chat wants to be notified
    pub lead_minutes: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("No date or time found in: {0}")]
    NoTemporalPattern(String),
}

/// Turns text like `tomorrow 18:00 dentist` or `every monday 09:00 standup`
/// into a trigger, a lead time and a title.
///
/// The lead time (`in 2 hours`) is cut out first. Then the recognizers run
/// in order and the first one to match decides the trigger. Whatever is left
/// of the text becomes the title. `now` and `tz` anchor relative phrases
/// like `today` to the chat's wall-clock.
pub fn parse(text: &str, tz: &ChatTimezone, now: DateTime<Utc>) -> Result<ParsedIntent, ParseError> {
    let (lead_minutes, rest) = lead_time::extract(text);

    for (name, recognize) in RECOGNIZERS {
        if let Some(recognized) = recognize(&rest, tz, now) {
            debug!(recognizer = *name, "Recognized temporal pattern");
            return Ok(ParsedIntent {
                title: clean_title(&rest, &recognized.spans),
                trigger: recognized.trigger,
                lead_minutes,
            });
        }
    }

    Err(ParseError::NoTemporalPattern(text.trim().to_string()))
}

fn clean_title(text: &str, spans: &[Range<usize>]) -> String {
    let mut spans = spans.to_vec();
    spans.sort_by_key(|span| span.start);

    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            kept.push_str(&text[cursor..span.start]);
        }
        kept.push(' ');
        cursor = cursor.max(span.end);
    }
    kept.push_str(&text[cursor..]);

    let title = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '–' | '—'))
        .to_string();

    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}
