use chrono::Weekday;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Month number (January = 1) of a word that is a prefix of an English
/// month name. At least three letters are required so that `ma` stays
/// ambiguous and unmatched.
pub fn month_from_word(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(&word))
        .map(|idx| idx as u32 + 1)
}

/// Full English weekday name, any casing
pub fn weekday_from_name(word: &str) -> Option<Weekday> {
    let word = word.to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, day)| *day)
}

/// Full name or the usual three letter abbreviation (`mon`, `tue`, ...)
pub fn weekday_from_word(word: &str) -> Option<Weekday> {
    let word = word.to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == word || (word.len() == 3 && name.starts_with(&word)))
        .map(|(_, day)| *day)
}

pub fn weekday_display_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_prefixes() {
        assert_eq!(month_from_word("March"), Some(3));
        assert_eq!(month_from_word("mar"), Some(3));
        assert_eq!(month_from_word("sept"), Some(9));
        assert_eq!(month_from_word("DEC"), Some(12));
        assert_eq!(month_from_word("ma"), None);
        assert_eq!(month_from_word("marsh"), None);
        assert_eq!(month_from_word("mom"), None);
    }

    #[test]
    fn weekday_words() {
        assert_eq!(weekday_from_name("Monday"), Some(Weekday::Mon));
        assert_eq!(weekday_from_name("mon"), None);
        assert_eq!(weekday_from_word("mon"), Some(Weekday::Mon));
        assert_eq!(weekday_from_word("THU"), Some(Weekday::Thu));
        assert_eq!(weekday_from_word("sunday"), Some(Weekday::Sun));
        assert_eq!(weekday_from_word("su"), None);
        assert_eq!(weekday_from_word("xyz"), None);
    }
}
