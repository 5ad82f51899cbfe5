use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
^ # anchor to start of string

(?:
  (?: # date is in ISO format (yyyy-mm-dd)
    (\d{4})-(\d{2})-(\d{2})
  ) | (?: # date is a name relative to the local date
    (today | yesterday)
  )
)

$ # anchor to end of string
",
    )
    .expect("Could not parse Regex")
});

/// Parses a calendar date.  Accepts `YYYY-MM-DD` as well as the keywords
/// `today` and `yesterday`, which are resolved against the caller's local
/// date.  The result is still a plain calendar date; interpreting it in a
/// timezone happens later, in [`crate::days`].
pub fn parse_date(date: &str, today: NaiveDate) -> Option<NaiveDate> {
    let captures = REGEX.captures(date.trim())?;

    match captures.get(4) {
        Some(name) if name.as_str().eq_ignore_ascii_case("today") => Some(today),
        Some(name) if name.as_str().eq_ignore_ascii_case("yesterday") => today.pred_opt(),
        Some(_) => None,
        None => NaiveDate::from_ymd_opt(
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
            captures[3].parse().ok()?,
        ),
    }
}
