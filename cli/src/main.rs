mod changelog;
mod cli;
mod commit_details;
mod error;
mod logging;
mod ui;
mod update_files;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn run(command: Commands) -> error::Result<()> {
    match command {
        Commands::UpdateChangelog {
            changelog,
            repo_url,
            version,
            timezone,
            workflow,
        } => changelog::update(
            &changelog,
            &repo_url,
            &version,
            timezone.as_deref(),
            &workflow,
        ),
        Commands::FormatChangelog {
            changelog,
            repo_url,
            release,
            check,
            timezone,
        } => changelog::format(
            &changelog,
            &repo_url,
            release.as_deref(),
            check,
            timezone.as_deref(),
        ),
        Commands::UpdateFiles {
            repo_root,
            version,
            files,
        } => update_files::execute(&repo_root, &version, &files),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = logging::init(cli.log_format, cli.verbose).and_then(|()| run(cli.command));

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
