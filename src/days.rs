// SPDX-License-Identifier: MPL-2.0

//! Conversions between local calendar days and the UTC instants they cover.
//!
//! Everything stored in the database is UTC; everything the user types is a
//! local date or time of day.  This module is the only place where the two
//! meet: a calendar date becomes the half-open UTC window `[earliest,
//! latest)` of that local day, and a date plus time of day becomes a single
//! UTC instant.  On daylight-saving transition days the window is 23 or 25
//! hours long, because the contract is midnight-to-midnight local time.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

/// Interprets `date` at `time` in the given timezone and normalizes to UTC.
///
/// Returns `None` when the local datetime does not exist (the wall clock
/// skipped over it in a daylight-saving jump).  Ambiguous local times (the
/// clock passed them twice) resolve to the earlier instant.
pub fn combine<Tz>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>>
where
    Tz: TimeZone,
{
    tz.with_ymd_and_hms(
        date.year(),
        date.month(),
        date.day(),
        time.hour(),
        time.minute(),
        time.second(),
    )
    .earliest()
    .map(|dt| dt.with_timezone(&Utc))
}

/// The half-open UTC window `[earliest, latest)` covered by one local
/// calendar day: local midnight of `date` up to local midnight of the
/// following day.
pub fn day_window<Tz>(date: NaiveDate, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)>
where
    Tz: TimeZone,
{
    let earliest = combine(date, NaiveTime::MIN, tz)?;
    let latest = combine(date.succ_opt()?, NaiveTime::MIN, tz)?;
    Some((earliest, latest))
}

/// Iterates over every date in `[start, end)`, ascending.  An empty or
/// inverted range yields nothing.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.succ_opt()).take_while(move |d| *d < end)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tzfile::Tz;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_window_covers_24_hours_in_utc() {
        let (earliest, latest) = day_window(date(2024, 4, 5), &Utc).unwrap();
        assert_eq!(earliest, Utc.with_ymd_and_hms(2024, 4, 5, 0, 0, 0).unwrap());
        assert_eq!(latest, Utc.with_ymd_and_hms(2024, 4, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn day_window_is_shifted_for_other_timezones() {
        let tz = Tz::named("Europe/Berlin").unwrap();
        let (earliest, latest) = day_window(date(2024, 1, 15), &&tz).unwrap();
        assert_eq!(
            earliest,
            Utc.with_ymd_and_hms(2024, 1, 14, 23, 0, 0).unwrap()
        );
        assert_eq!(latest, Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap());
    }

    #[test]
    fn day_window_is_23_hours_on_spring_forward_day() {
        // Berlin loses an hour on 2024-03-31.
        let tz = Tz::named("Europe/Berlin").unwrap();
        let (earliest, latest) = day_window(date(2024, 3, 31), &&tz).unwrap();
        assert_eq!(latest - earliest, Duration::hours(23));
    }

    #[test]
    fn day_window_is_25_hours_on_fall_back_day() {
        // Berlin gains an hour on 2024-10-27.
        let tz = Tz::named("Europe/Berlin").unwrap();
        let (earliest, latest) = day_window(date(2024, 10, 27), &&tz).unwrap();
        assert_eq!(latest - earliest, Duration::hours(25));
    }

    #[test]
    fn combine_normalizes_local_times_to_utc() {
        let tz = Tz::named("Europe/Berlin").unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let instant = combine(date(2024, 1, 15), time, &&tz).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn combine_rejects_skipped_local_times() {
        // 02:30 does not exist in Berlin on the spring-forward day.
        let tz = Tz::named("Europe/Berlin").unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        assert_eq!(combine(date(2024, 3, 31), time, &&tz), None);
    }

    #[test]
    fn date_range_is_half_open_and_ascending() {
        let dates: Vec<_> = date_range(date(2024, 1, 1), date(2024, 1, 4)).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }

    #[test]
    fn date_range_is_empty_when_inverted() {
        assert_eq!(date_range(date(2024, 1, 4), date(2024, 1, 1)).count(), 0);
    }
}
