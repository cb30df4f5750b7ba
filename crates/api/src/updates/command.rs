/// A text message split into the command it invokes and its arguments
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Timezone(&'a str),
    Report(&'a str),
    List(&'a str),
    Timetable(&'a str),
    /// Anything that is not a known command
    Text(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        if !text.starts_with('/') {
            return Self::Text(text);
        }

        let (name, args) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        // Commands in groups are addressed as `/list@tickler_bot`
        let name = name.split('@').next().unwrap_or(name);
        let args = args.trim();

        match name.to_lowercase().as_str() {
            "/start" | "/help" => Self::Help,
            "/timezone" => Self::Timezone(args),
            "/report" => Self::Report(args),
            "/list" => Self::List(args),
            "/timetable" => Self::Timetable(args),
            _ => Self::Text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start"), Command::Help);
        assert_eq!(Command::parse("/help@tickler_bot"), Command::Help);
        assert_eq!(
            Command::parse("/timezone  Europe/Moscow "),
            Command::Timezone("Europe/Moscow")
        );
        assert_eq!(Command::parse("/report off"), Command::Report("off"));
        assert_eq!(Command::parse("/list"), Command::List(""));
        assert_eq!(Command::parse("/LIST week"), Command::List("week"));
        assert_eq!(
            Command::parse("/timetable set mon 10-18 Work"),
            Command::Timetable("set mon 10-18 Work")
        );
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(
            Command::parse("  tomorrow 18:00 dentist "),
            Command::Text("tomorrow 18:00 dentist")
        );
        assert_eq!(Command::parse("/unknown 10:00"), Command::Text("/unknown 10:00"));
    }
}
