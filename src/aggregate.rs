// SPDX-License-Identifier: MPL-2.0

//! Per-day duration aggregation and day-scoped stint listing.
//!
//! Both consumers go through the same selection query
//! ([`Stints::in_window`]); aggregation additionally clips each stint to
//! the day window before summing.  Everything here is a pure read and can
//! be recomputed at any time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{
    days::{date_range, day_window},
    error::{Error, Result},
    stints::{StintTuple, Stints},
};

fn window_for<Tz>(date: NaiveDate, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)>
where
    Tz: TimeZone,
{
    day_window(date, tz).ok_or(Error::NonexistentLocalTime {
        date,
        time: NaiveTime::MIN,
    })
}

/// The part of `[start, end)` that falls inside `[earliest, latest)`.
/// Callers only pass intervals that overlap the window, so the result is
/// always positive.
fn clipped(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
) -> Duration {
    end.min(latest) - start.max(earliest)
}

fn sum_hours<I>(intervals: I, earliest: DateTime<Utc>, latest: DateTime<Utc>) -> f64
where
    I: Iterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
{
    let seconds: i64 = intervals
        .map(|(start, end)| clipped(start, end, earliest, latest).num_seconds())
        .sum();
    seconds as f64 / 3600.0
}

/// Total hours worked on one local calendar day, with stints straddling a
/// day boundary clipped to the day's window.
pub fn hours_for_day<Tz>(stints: &mut Stints, date: NaiveDate, tz: &Tz) -> Result<f64>
where
    Tz: TimeZone,
{
    let (earliest, latest) = window_for(date, tz)?;
    let selected = stints.in_window(earliest, latest)?;
    Ok(sum_hours(
        selected
            .iter()
            .map(|(stint, _)| (stint.started_at, stint.ended_at)),
        earliest,
        latest,
    ))
}

/// Total hours for every day in `[start_date, end_date)`, ascending, one
/// entry per day including days with no stints at all.
pub fn hours_for_range<Tz>(
    stints: &mut Stints,
    start_date: NaiveDate,
    end_date: NaiveDate,
    tz: &Tz,
) -> Result<Vec<(NaiveDate, f64)>>
where
    Tz: TimeZone,
{
    date_range(start_date, end_date)
        .map(|date| Ok((date, hours_for_day(stints, date, tz)?)))
        .collect()
}

/// The day's stints for display: same selection as the aggregation, no
/// clipping, sorted by start ascending.
pub fn list_stints_for_day<Tz>(
    stints: &mut Stints,
    date: NaiveDate,
    tz: &Tz,
) -> Result<Vec<StintTuple>>
where
    Tz: TimeZone,
{
    let (earliest, latest) = window_for(date, tz)?;
    stints.in_window(earliest, latest)
}
