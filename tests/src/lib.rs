//! Fixture loading for the changelog formatting tests.
//!
//! `resources/changelogs.json` lists groups of one original changelog, its
//! canonical rendering, and the rendering after promoting the Unreleased
//! section to each listed version.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ChangelogGroup {
    original: String,
    formatted: String,
    url: String,
    date: NaiveDate,
    #[serde(default)]
    bumps: BTreeMap<String, String>,
}

/// One expected rendering of an original changelog
#[derive(Debug, Clone)]
pub struct ChangelogUpdate {
    pub original: PathBuf,
    /// Version the Unreleased section is promoted to, if any
    pub version: Option<String>,
    pub expected: PathBuf,
    pub url: String,
    pub date: NaiveDate,
}

impl ChangelogUpdate {
    pub fn original_text(&self) -> String {
        read(&self.original)
    }

    pub fn expected_text(&self) -> String {
        read(&self.expected)
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

pub fn resource_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// Every formatting and bump expectation from `changelogs.json`
pub fn changelog_updates() -> Vec<ChangelogUpdate> {
    let resources = resource_path();
    let groups: Vec<ChangelogGroup> =
        serde_json::from_str(&read(&resources.join("changelogs.json")))
            .unwrap_or_else(|e| panic!("Invalid changelogs.json: {e}"));

    let mut updates = Vec::new();
    for group in groups {
        let original = resources.join(&group.original);
        updates.push(ChangelogUpdate {
            original: original.clone(),
            version: None,
            expected: resources.join(&group.formatted),
            url: group.url.clone(),
            date: group.date,
        });

        for (version, expected) in &group.bumps {
            updates.push(ChangelogUpdate {
                original: original.clone(),
                version: Some(version.clone()),
                expected: resources.join(expected),
                url: group.url.clone(),
                date: group.date,
            });
        }
    }
    updates
}

/// Canonical renderings, which must survive another parse and render
pub fn formatted_files() -> Vec<(PathBuf, String)> {
    changelog_updates()
        .into_iter()
        .map(|update| (update.expected, update.url))
        .collect()
}
