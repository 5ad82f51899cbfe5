use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
^ # anchor to start of string

(\d{1,2}):(\d{2})(?::(\d{2}))? # HH:MM with optional seconds

$ # anchor to end of string
",
    )
    .expect("Could not parse Regex")
});

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(time: &str) -> Option<NaiveTime> {
    let captures = REGEX.captures(time.trim())?;

    NaiveTime::from_hms_opt(
        captures[1].parse().ok()?,
        captures[2].parse().ok()?,
        captures
            .get(3)
            .map(|s| s.as_str().parse().ok())
            .unwrap_or(Some(0))?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        let parsed = parse_time("09:30").unwrap();
        assert_eq!(parsed, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn parses_seconds_when_given() {
        let parsed = parse_time("23:59:59").unwrap();
        assert_eq!(parsed, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn parses_single_digit_hours() {
        let parsed = parse_time("7:05").unwrap();
        assert_eq!(parsed, NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:60"), None);
    }

    #[test]
    fn rejects_missing_minutes() {
        assert_eq!(parse_time("12"), None);
    }
}
