use std::fs;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use path_clean::PathClean;
use regex::{Captures, Regex};

use crate::error::{Result, ResultExt, VersionError};

const NOTICE_TARGET: &str = "notice";

/// Directories a version file may never live in
const PROTECTED_DIRECTORIES: [&str; 2] = [".git", ".github"];

/// A line assigning a version, such as `version = "1.0.0"`,
/// `__version__: str = '1.0.0'  # comment`, `"version": "1.0.0",` or
/// `Plugin-Version: 1.0.0`.
///
/// `vquote`/`vclose` and `quote`/`close` must hold the same character, and
/// `key` must not name a JAR manifest version. Both are checked on each
/// match.
static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?imR)^",
        r"(?P<prefix>[\t ]*(?P<vquote>['\x22]?)(?P<key>[\w-]*?)",
        r"(?:__)?version(?:__)?(?P<vclose>['\x22]?)",
        r"(?:[\t ]*:[\t ]*\w+[\t ]*=|[\t ]*[=:]?)[\t ]*(?P<quote>['\x22]?))",
        r"(?P<version>[^\r\n]*?)",
        r"(?P<suffix>(?P<close>['\x22]?),?[\t ]*(?:#[^\r\n]*)?)",
        r"$",
    ))
    .expect("Failed to compile version assignment regex")
});

fn is_assignment(captures: &Captures<'_>) -> bool {
    captures["vquote"] == captures["vclose"]
        && captures["quote"] == captures["close"]
        && !captures["key"].to_lowercase().ends_with("manifest-")
}

/// Replace the version in the one version assignment of `path`
///
/// # Errors
/// Returns error if the file cannot be read or written, or if it does not
/// contain exactly one version assignment. The file is left untouched on
/// error.
pub fn update_file(version: &str, path: &Path) -> Result<()> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut changes: Vec<(String, String)> = Vec::new();
    let updated = VERSION_PATTERN.replace_all(&original, |captures: &Captures<'_>| {
        if !is_assignment(captures) {
            return captures[0].to_string();
        }
        let replacement = format!("{}{version}{}", &captures["prefix"], &captures["suffix"]);
        changes.push((captures[0].to_string(), replacement.clone()));
        replacement
    });

    match changes.len() {
        0 => Err(VersionError::VersionNotFound(path.to_path_buf())),
        1 => {
            fs::write(path, updated.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(target: NOTICE_TARGET, "Version updated in {}", path.display());
            Ok(())
        }
        count => {
            tracing::error!("Multiple versions updated in {}", path.display());
            for (before, after) in &changes {
                tracing::debug!("`{before}` -> `{after}`");
            }
            Err(VersionError::MultipleVersions(path.to_path_buf(), count))
        }
    }
}

/// Update every file in the comma-separated `files` list, each relative to
/// `repo_root`
///
/// # Errors
/// Returns error on the first file that is outside the repository, inside a
/// protected folder, missing, or fails to update
pub fn update_files(repo_root: &Path, version: &str, files: &str) -> Result<Vec<PathBuf>> {
    let root = repo_root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", repo_root.display()))?;

    let mut updated = Vec::new();
    for item in files.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let path = resolve_version_file(&root, item)?;
        update_file(version, &path)?;
        updated.push(path);
    }
    Ok(updated)
}

fn resolve_version_file(root: &Path, item: &str) -> Result<PathBuf> {
    let joined = root.join(item).clean();
    let full = if joined.exists() {
        joined
            .canonicalize()
            .with_context(|| format!("Failed to resolve {item}"))?
    } else {
        joined
    };

    let relative = full
        .strip_prefix(root)
        .map_err(|_| VersionError::OutsideRepository(item.to_string()))?;

    let protected = relative.components().any(|component| match component {
        Component::Normal(name) => PROTECTED_DIRECTORIES
            .iter()
            .any(|directory| name == *directory),
        _ => false,
    });
    if protected {
        return Err(VersionError::ProtectedPath(item.to_string()));
    }

    if !full.is_file() {
        return Err(VersionError::MissingFile(item.to_string()));
    }
    Ok(full)
}
