// SPDX-License-Identifier: MPL-2.0

use std::{fmt::Display, io::Write};

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};

use crate::stints::StintTuple;

/// Prints one day's stints as a table, times rendered in the given local
/// timezone.  The caller supplies the stints sorted by start.
pub fn print_stints<Tz>(
    writer: &mut impl Write,
    date: NaiveDate,
    stints: &[StintTuple],
    tz: &Tz,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(writer, "Stints for {date}")?;
    writeln!(writer, "Start End   Dur. Project              Description")?;
    writeln!(writer, "===== ===== ==== ==================== ============--..")?;
    for (stint, project) in stints {
        let started_at = stint.started_at.with_timezone(tz);
        let ended_at = stint.ended_at.with_timezone(tz);
        let minutes = (stint.ended_at - stint.started_at).num_minutes();
        writeln!(
            writer,
            "{} {} {:4} {:20} {}",
            started_at.format("%H:%M"),
            ended_at.format("%H:%M"),
            minutes,
            project.name,
            stint.description,
        )?;
    }
    Ok(())
}

/// Prints per-day hour totals, one row per day.
pub fn print_hours(writer: &mut impl Write, totals: &[(NaiveDate, f64)]) -> Result<()> {
    writeln!(writer, "Date        Hours")?;
    writeln!(writer, "==========  =====")?;
    for (date, hours) in totals {
        writeln!(writer, "{date}  {hours:5.2}")?;
    }
    Ok(())
}
