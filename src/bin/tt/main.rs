use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use stintlog::commands::{Arguments, Commands};
use stintlog::config::load_config;

mod commands;

fn main() -> Result<()> {
    dotenv().ok();
    let args = Arguments::parse();

    stderrlog::new()
        .quiet(args.quiet)
        .verbosity(args.verbose as usize + 2)
        .init()?;

    let config = load_config(args.config);

    match args.command {
        Commands::Add(add) => commands::add(config, add)?,
        Commands::Mark(mark) => commands::mark(config, mark)?,
        Commands::Hours(hours) => commands::hours(config, hours)?,
        Commands::Ls(list_stints) => commands::ls(config, list_stints)?,
        Commands::NewProject(new_project) => commands::new_project(config, new_project)?,
    }
    Ok(())
}
