use crate::cli::WorkflowArgs;
use crate::commit_details;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use ::changelog::Changelog;
use ::changelog::diagnostics::NOTICE_TARGET;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::Path;

/// Today's date in `timezone`, falling back to UTC when it is unset or
/// unknown
pub fn release_date(timezone: Option<&str>) -> NaiveDate {
    date_in(timezone, Utc::now())
}

fn date_in(timezone: Option<&str>, now: DateTime<Utc>) -> NaiveDate {
    match timezone.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => now.with_timezone(&tz).date_naive(),
            Err(_) => {
                tracing::warn!("Time zone `{name}` not found! Defaulting to UTC");
                now.date_naive()
            }
        },
        None => {
            tracing::info!(target: NOTICE_TARGET, "No time zone provided, defaulting to UTC");
            now.date_naive()
        }
    }
}

fn parse(path: &Path, repo_url: &str) -> Result<Changelog> {
    Changelog::from_path(path, repo_url).map_err(|err| {
        tracing::error!("Could not parse changelog");
        CliError::from(err).with_context(format!("Failed to load {}", path.display()))
    })
}

/// Promote the Unreleased section of `path` to `version`, rewrite the file
/// and record the commit details for the workflow
pub fn update(
    path: &Path,
    repo_url: &str,
    version: &str,
    timezone: Option<&str>,
    workflow: &WorkflowArgs,
) -> Result<()> {
    let date = release_date(timezone);
    let mut changelog = parse(path, repo_url)?;

    changelog.update_version(version, date);
    changelog
        .write(path)
        .with_context(|| format!("Failed to update {}", path.display()))?;
    ui::success_message(&format!(
        "Updated {} for version {version} ({date})",
        path.display()
    ));

    commit_details::write(version, workflow)
}

/// Print the canonical form of `path`, or with `check` only verify that the
/// file already is canonical
pub fn format(
    path: &Path,
    repo_url: &str,
    release: Option<&str>,
    check: bool,
    timezone: Option<&str>,
) -> Result<()> {
    let mut changelog = parse(path, repo_url)?;
    if let Some(version) = release {
        changelog.update_version(version, release_date(timezone));
    }
    let rendered = changelog.render();

    if !check {
        print!("{rendered}");
        return Ok(());
    }

    let current = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if current != rendered {
        return Err(CliError::NotCanonical(path.to_path_buf()));
    }
    ui::info_message(&format!("{} is already canonical", path.display()));
    Ok(())
}
