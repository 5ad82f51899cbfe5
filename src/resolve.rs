// SPDX-License-Identifier: MPL-2.0

//! Derivation of a new stint's `(start, end)` pair.
//!
//! The resolver is pure with respect to storage: it reads predecessor
//! stints and marks through [`Predecessors`], and when the start comes from
//! a mark it hands the mark back to the caller, who must delete it in the
//! same transaction that inserts the stint.  The resolver itself never
//! writes anything.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{
    days::combine,
    error::{Error, Result},
    stints::Mark,
};

/// Using a predecessor stint older than this requires `--force`.
const STINT_STALE_AFTER: i64 = 2;
/// Using a mark older than this requires `--force`.
const MARK_STALE_AFTER: i64 = 12;

/// How the end of the new stint is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMode {
    /// The stint ends right now.  Only valid when the request's date is the
    /// current local day.
    Now,
    /// The stint ends at this local time of day on the request's date.
    At(NaiveTime),
}

/// How the start of the new stint is determined.  Exactly one of these is
/// ever in play; the `since_*` variants carry their own staleness override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// An explicit local time of day on the request's date.
    ExplicitStart(NaiveTime),
    /// This many minutes before the end.
    Duration(i64),
    /// The end of the most recently completed stint.
    SinceLastStint { force: bool },
    /// The most recent mark set after the last completed stint.
    SinceLastMark { force: bool },
}

impl Origin {
    /// Maps the raw CLI flags onto exactly one origin mode.  Zero or more
    /// than one selected flag is a configuration error.
    pub fn pick(
        start_time: Option<NaiveTime>,
        duration: Option<i64>,
        since_last_stint: bool,
        since_last_mark: bool,
        force: bool,
    ) -> Result<Origin> {
        let mut picked = Vec::with_capacity(1);
        if let Some(time) = start_time {
            picked.push(Origin::ExplicitStart(time));
        }
        if let Some(minutes) = duration {
            picked.push(Origin::Duration(minutes));
        }
        if since_last_stint {
            picked.push(Origin::SinceLastStint { force });
        }
        if since_last_mark {
            picked.push(Origin::SinceLastMark { force });
        }

        match picked.len() {
            1 => Ok(picked.remove(0)),
            selected => Err(Error::OriginModes { selected }),
        }
    }
}

/// A request to log a stint, before any times have been resolved.
#[derive(Debug, Clone, Copy)]
pub struct StintRequest {
    /// The local calendar day the stint belongs to.  Defaults to today.
    pub date: Option<NaiveDate>,
    pub end: EndMode,
    pub origin: Origin,
}

/// The resolver's output: a validated UTC interval, plus the mark the
/// caller must delete in the same transaction that inserts the stint.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub consume_mark: Option<Mark>,
}

/// The predecessor lookups the resolver needs from storage.
pub trait Predecessors {
    /// The end of the most recently completed stint (`ended_at <= now`),
    /// if any stint has been logged at all.
    fn latest_completed_stint(&mut self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>>;

    /// The most recent mark set strictly after `instant`.  Older marks are
    /// never surfaced.
    fn latest_mark_after(&mut self, instant: DateTime<Utc>) -> Result<Option<Mark>>;
}

/// Resolves the start and end instants for `request` at the current time
/// `now`, interpreting local dates and times in `tz`.
pub fn resolve_stint_time<Tz, P>(
    request: &StintRequest,
    store: &mut P,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<Resolved>
where
    Tz: TimeZone,
    P: Predecessors + ?Sized,
{
    let today = now.with_timezone(tz).date_naive();
    let date = request.date.unwrap_or(today);

    let end = match request.end {
        EndMode::Now => {
            // A historical date with an end of "now" is almost certainly a
            // mistyped invocation; require an explicit end time instead.
            if date != today {
                return Err(Error::EndNowOnPastDate { date });
            }
            now
        }
        EndMode::At(time) => {
            combine(date, time, tz).ok_or(Error::NonexistentLocalTime { date, time })?
        }
    };

    let (start, consume_mark) = match request.origin {
        Origin::ExplicitStart(time) => {
            let start =
                combine(date, time, tz).ok_or(Error::NonexistentLocalTime { date, time })?;
            (start, None)
        }
        Origin::Duration(minutes) => (end - Duration::minutes(minutes), None),
        Origin::SinceLastStint { force } => {
            let previous_end = store
                .latest_completed_stint(now)?
                .ok_or(Error::NoPreviousStint)?;
            if !force && end - previous_end > Duration::hours(STINT_STALE_AFTER) {
                return Err(Error::StaleStint { end: previous_end });
            }
            (previous_end, None)
        }
        Origin::SinceLastMark { force } => {
            // A mark is only meaningful after the last completed stint; if
            // nothing has ever been logged there is nothing to anchor it to.
            let previous_end = store
                .latest_completed_stint(now)?
                .ok_or(Error::NoMarkAvailable)?;
            let mark = store
                .latest_mark_after(previous_end)?
                .ok_or(Error::NoMarkAvailable)?;
            if !force && now - mark.marked_at > Duration::hours(MARK_STALE_AFTER) {
                return Err(Error::StaleMark {
                    when: mark.marked_at,
                });
            }
            (mark.marked_at, Some(mark))
        }
    };

    if start >= end {
        return Err(Error::MalformedInterval { start, end });
    }

    Ok(Resolved {
        start,
        end,
        consume_mark,
    })
}
