//! Parsing and canonical rewriting of keepachangelog-style `CHANGELOG.md`
//! files.
//!
//! Text is tokenized into top-level markdown blocks, split into one group per
//! release heading, and checked against a fixed schema: a free-form header,
//! then releases whose change entries sit under the categories `Added`,
//! `Changed`, `Deprecated`, `Removed`, `Fixed` and `Security`. Rendering
//! emits the canonical form with generated comparison links.

pub mod category;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod release;
pub mod renderer;
pub mod token;
pub mod tokenizer;
pub mod types;
pub mod utils;

use chrono::NaiveDate;
use std::path::Path;

pub use category::{Category, Sections};
pub use self::core::Changelog;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::ChangelogError;
pub use release::{ChangelogVersion, UNRELEASED};
pub use types::{Result, TokenGroup};

/// Promotes the Unreleased section of the changelog at `path` to `version`
/// dated `date` and rewrites the file in canonical form
///
/// # Errors
/// Returns error if the file cannot be read, parsed or written
pub fn update_changelog(
    path: impl AsRef<Path>,
    repo_url: &str,
    version: &str,
    date: NaiveDate,
) -> Result<Changelog> {
    let path = path.as_ref();
    let mut changelog = Changelog::from_path(path, repo_url)?;
    changelog.update_version(version, date);
    changelog.write(path)?;
    Ok(changelog)
}
