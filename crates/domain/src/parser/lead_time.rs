use super::vocabulary::month_from_word;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lead time used when the text does not say how early to notify
pub const DEFAULT_LEAD_MINUTES: i64 = 30;

static LEAD_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin\s+(\d{1,4})\s*(minutes?|mins?|m|hours?|hrs?|h)?\b")
        .expect("lead time pattern is valid")
});

/// Finds the `in N minutes` / `in N hours` lead time and cuts it out of the
/// text.
///
/// Returns the lead in minutes together with the remaining text. A number
/// directly followed by `:`, `.` or `-` and a digit is the start of a clock
/// time or a date and not a lead time.
pub fn extract(text: &str) -> (i64, String) {
    for caps in LEAD_TIME.captures_iter(text) {
        let (whole, number) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(number)) => (whole, number),
            _ => continue,
        };
        let tail = &text[number.end()..];
        if continues_as_time_or_date(tail) {
            continue;
        }
        let unit = caps.get(2);
        if unit.is_none() && continues_as_named_month(tail) {
            continue;
        }
        let amount = match number.as_str().parse::<i64>() {
            Ok(amount) => amount,
            Err(_) => continue,
        };
        let is_hours = unit
            .map(|unit| unit.as_str().to_lowercase().starts_with('h'))
            .unwrap_or(false);
        let minutes = if is_hours { amount * 60 } else { amount };

        let mut rest = String::with_capacity(text.len());
        rest.push_str(&text[..whole.start()]);
        rest.push(' ');
        rest.push_str(&text[whole.end()..]);
        return (minutes, rest);
    }

    (DEFAULT_LEAD_MINUTES, text.to_string())
}

fn continues_as_time_or_date(tail: &str) -> bool {
    let mut chars = tail.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(':' | '.' | '-'), Some(c)) if c.is_ascii_digit()
    )
}

/// `12 march`: the number is a day of the month
fn continues_as_named_month(tail: &str) -> bool {
    let word: String = tail
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    month_from_word(&word).is_some()
}
