// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    /// increase the verbosity
    ///
    /// This flag can be used multiple times to increase the amount of
    /// information produced by stintlog
    #[arg(global = true, short, long, action = clap::ArgAction::Count, help_heading = "Logging")]
    pub verbose: u8,

    /// output no logging
    ///
    /// Setting quiet disables all logging to stderr.  Data will only be printed
    /// to stdout, and only for commands that output information as their main
    /// action.
    #[arg(global = true, long, action = clap::ArgAction::SetTrue, help_heading = "Logging")]
    pub quiet: bool,

    /// path to an alternative configuration file
    #[arg(global = true, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a completed stint of work
    ///
    /// Resolves the stint's start and end and stores it against a project.
    /// The end defaults to the current time; the start comes from exactly
    /// one of --start-time, --duration, --last, or --mark.  Using --mark
    /// consumes the mark it started from.
    ///
    /// Aliases: log
    #[clap(aliases = &["log"])]
    Add(Add),

    /// Set a mark at the moment work begins
    ///
    /// A mark is a single-use bookmark: set it when you start working, and
    /// later log the stint with `add --mark` to use the marked time as the
    /// stint's start.  A newer mark supersedes an older one.
    Mark(Mark),

    /// Show total hours worked
    ///
    /// With --date (or no flags), shows the total for one day.  With
    /// --from and --to, shows one row per day in the half-open range
    /// [from, to).
    Hours(Hours),

    /// List the stints of one day
    ///
    /// Shows every stint touching the given local day, sorted by start
    /// time.
    ///
    /// Aliases: list, list-stints
    #[clap(aliases = &["list", "list-stints"])]
    Ls(ListStints),

    /// Create a new project
    ///
    /// Project names are unique; creating a name that already exists is an
    /// error.
    NewProject(NewProject),
}

#[derive(Args, Debug)]
pub struct Add {
    /// what the work was
    ///
    /// All trailing words are joined into the stint's description.
    #[arg(required = true)]
    pub description: Vec<String>,

    /// the project to log against
    ///
    /// Must already exist, unless --new-project is also given.
    #[arg(short = 'p', long)]
    pub project: String,

    /// create the project before logging
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub new_project: bool,

    /// the calendar day the stint belongs to
    ///
    /// Defaults to today.  Accepts YYYY-MM-DD, "today", or "yesterday",
    /// interpreted in the local timezone.
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// when the stint ended
    ///
    /// Defaults to "now", which is only valid when the date is today.  Any
    /// other day needs an explicit HH:MM or HH:MM:SS end time.
    #[arg(short = 'e', long, default_value = "now")]
    pub end_time: String,

    /// when the stint started, as a local time of day
    #[arg(short = 's', long)]
    pub start_time: Option<String>,

    /// how long the stint lasted, in minutes, counted back from the end
    #[arg(long)]
    pub duration: Option<i64>,

    /// start where the previous stint ended
    ///
    /// Refuses gaps of more than 2 hours unless --force is given.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub last: bool,

    /// start at the most recent mark, consuming it
    ///
    /// Refuses marks older than 12 hours unless --force is given.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub mark: bool,

    /// override the staleness guard of --last or --mark
    #[arg(short = 'f', long, action = clap::ArgAction::SetTrue)]
    pub force: bool,

    /// free-form comment stored with the stint
    #[arg(short = 'c', long)]
    pub comment: Option<String>,
}

#[derive(Args, Debug)]
pub struct Mark {
    /// when work began, as a local time of day today
    ///
    /// Defaults to the current time.
    #[arg(short = 't', long)]
    pub time: Option<String>,
}

#[derive(Args, Debug)]
pub struct Hours {
    /// the day to total up
    ///
    /// Defaults to today.  Cannot be combined with --from/--to.
    #[arg(short = 'd', long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,

    /// first day of the range (inclusive)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// day the range stops at (exclusive)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListStints {
    /// the day to list
    ///
    /// Defaults to today.
    #[arg(short = 'd', long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct NewProject {
    /// project name
    pub name: String,

    /// what this project is about
    #[arg(long)]
    pub description: Option<String>,
}
