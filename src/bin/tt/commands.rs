// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime, SubsecRound as _, Utc};
use stintlog::{
    aggregate::{hours_for_day, hours_for_range, list_stints_for_day},
    commands::{Add, Hours, ListStints, Mark, NewProject},
    config::Config,
    days, locate,
    error::Error,
    parse::{parse_date, parse_time},
    print::{print_hours, print_stints},
    resolve::{resolve_stint_time, EndMode, Origin, StintRequest},
    stints::{establish_connection, Stints},
};

fn today() -> NaiveDate {
    Local::now().naive_local().date()
}

fn parse_date_arg(arg: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>, Error> {
    arg.map(|d| parse_date(d, today).ok_or_else(|| Error::InvalidDate(d.to_owned())))
        .transpose()
}

fn parse_time_arg(arg: &str) -> Result<NaiveTime, Error> {
    parse_time(arg).ok_or_else(|| Error::InvalidTime(arg.to_owned()))
}

pub fn add(config: Config, add: Add) -> Result<()> {
    let now = Utc::now().round_subsecs(0);
    let today = today();

    let date = parse_date_arg(add.date.as_deref(), today)?;
    let end = if add.end_time.eq_ignore_ascii_case("now") {
        EndMode::Now
    } else {
        EndMode::At(parse_time_arg(&add.end_time)?)
    };
    let start_time = add
        .start_time
        .as_deref()
        .map(parse_time_arg)
        .transpose()?;
    let origin = Origin::pick(start_time, add.duration, add.last, add.mark, add.force)?;
    let request = StintRequest { date, end, origin };

    let mut conn = establish_connection(&config.database_path)?;
    let mut stints = Stints::new(&mut conn);

    if add.new_project {
        stints.create_project(&add.project, None)?;
        log::info!("Created project {}", add.project);
    }
    let project = stints.lookup_project(&add.project)?;

    let resolved = resolve_stint_time(&request, &mut stints, &Local, now)?;

    let location = config.location_command.as_deref().and_then(|command| {
        locate::current_location(command, Duration::from_millis(config.location_timeout_ms))
    });

    let description = add.description.join(" ");
    stints.add_stint(
        &resolved,
        &project,
        &description,
        add.comment.as_deref(),
        location,
    )?;
    log::info!(
        "Added stint for {} from {} to {}",
        add.project,
        resolved.start,
        resolved.end
    );
    if resolved.consume_mark.is_some() {
        log::info!("Consumed the mark the stint started from");
    }

    Ok(())
}

pub fn mark(config: Config, mark: Mark) -> Result<()> {
    let when = match mark.time.as_deref() {
        None => Utc::now().round_subsecs(0),
        Some(time) => {
            let time = parse_time_arg(time)?;
            days::combine(today(), time, &Local).ok_or(Error::NonexistentLocalTime {
                date: today(),
                time,
            })?
        }
    };

    let mut conn = establish_connection(&config.database_path)?;
    let mut stints = Stints::new(&mut conn);
    stints.set_mark(when)?;
    log::info!("Marked {when} as the start of the next stint");

    Ok(())
}

pub fn hours(config: Config, hours: Hours) -> Result<()> {
    let today = today();
    let mut conn = establish_connection(&config.database_path)?;
    let mut stints = Stints::new(&mut conn);

    match (&hours.from, &hours.to) {
        (Some(from), Some(to)) => {
            let from = parse_date(from, today).ok_or_else(|| Error::InvalidDate(from.clone()))?;
            let to = parse_date(to, today).ok_or_else(|| Error::InvalidDate(to.clone()))?;
            let totals = hours_for_range(&mut stints, from, to, &Local)?;

            let mut stdout = std::io::stdout().lock();
            print_hours(&mut stdout, &totals)?;
        }
        _ => {
            let date = parse_date_arg(hours.date.as_deref(), today)?.unwrap_or(today);
            let total = hours_for_day(&mut stints, date, &Local)?;
            println!("{total:.2}");
        }
    }

    Ok(())
}

pub fn ls(config: Config, list_stints: ListStints) -> Result<()> {
    let today = today();
    let date = parse_date_arg(list_stints.date.as_deref(), today)?.unwrap_or(today);

    let mut conn = establish_connection(&config.database_path)?;
    let mut stints = Stints::new(&mut conn);
    let listed = list_stints_for_day(&mut stints, date, &Local)?;

    let mut stdout = std::io::stdout().lock();
    print_stints(&mut stdout, date, &listed, &Local)?;

    Ok(())
}

pub fn new_project(config: Config, new_project: NewProject) -> Result<()> {
    let mut conn = establish_connection(&config.database_path)?;
    let mut stints = Stints::new(&mut conn);
    let project = stints.create_project(&new_project.name, new_project.description.as_deref())?;
    log::info!("Created project {}", project.name);

    Ok(())
}
