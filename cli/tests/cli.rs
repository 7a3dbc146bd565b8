use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const URL: &str = "https://github.com/org/repo";

const MESSY: &str = "\
# Changelog

## [Unreleased]
### Add
* New flag

# [v1.0.0] - 2020-01-01
## Fixed
- Crash on start
";

const CANONICAL: &str = "\
# Changelog

## [Unreleased]

### Added

- New flag

## [1.0.0] - 2020-01-01

### Fixed

- Crash on start

[unreleased]: https://github.com/org/repo/compare/v1.0.0...HEAD
[1.0.0]: https://github.com/org/repo/releases/tag/v1.0.0
";

const WORKFLOW_VARIABLES: [&str; 8] = [
    "GITHUB_OUTPUT",
    "GITHUB_WORKSPACE",
    "GITHUB_ACTOR",
    "GITHUB_TRIGGERING_ACTOR",
    "GITHUB_REF_NAME",
    "BUMP_TYPE",
    "EXACT_VERSION",
    "CHANGELOG_TIMEZONE",
];

/// The binary with no workflow variables leaking in from the environment
fn bumpchanges() -> Command {
    let mut cmd = Command::cargo_bin("bumpchanges").unwrap();
    for name in WORKFLOW_VARIABLES {
        cmd.env_remove(name);
    }
    cmd.env_remove("RUST_LOG").env("BUMPCHANGES_LOG_FORMAT", "github");
    cmd
}

fn write_changelog(dir: &Path, contents: &str) -> String {
    let path = dir.join("CHANGELOG.md");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_format_prints_canonical_text() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), MESSY);

    bumpchanges()
        .args(["format-changelog", &path, URL])
        .assert()
        .success()
        .stdout(CANONICAL)
        .stderr(predicate::str::contains(
            "::notice::Changing `[v1.0.0] - 2020-01-01` from h1 to h2",
        ));

    assert_eq!(fs::read_to_string(&path).unwrap(), MESSY);
}

#[test]
fn test_format_check() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), MESSY);

    bumpchanges()
        .args(["format-changelog", "--check", &path, URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in canonical form"));

    fs::write(&path, CANONICAL).unwrap();
    bumpchanges()
        .args(["format-changelog", "--check", &path, URL])
        .assert()
        .success();
}

#[test]
fn test_format_with_version_promotes_unreleased() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), CANONICAL);

    bumpchanges()
        .args(["format-changelog", "--version", "1.1.0", &path, URL])
        .env("CHANGELOG_TIMEZONE", "UTC")
        .assert()
        .success()
        .stdout(predicate::str::contains("## [1.1.0] - "))
        .stdout(predicate::str::contains(
            "[1.1.0]: https://github.com/org/repo/compare/v1.0.0...v1.1.0\n",
        ));
}

#[test]
fn test_update_changelog_writes_file_and_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), MESSY);
    let output = temp_dir.path().join("github_output");

    bumpchanges()
        .args(["update-changelog", &path, URL, "1.1.0"])
        .env("CHANGELOG_TIMEZONE", "Europe/Berlin")
        .env("GITHUB_OUTPUT", &output)
        .env("GITHUB_WORKSPACE", temp_dir.path())
        .env("GITHUB_ACTOR", "alice")
        .env("GITHUB_TRIGGERING_ACTOR", "alice")
        .env("GITHUB_REF_NAME", "main")
        .env("BUMP_TYPE", "minor")
        .assert()
        .success();

    let updated = fs::read_to_string(&path).unwrap();
    assert!(updated.starts_with("# Changelog\n\n## [1.1.0] - "));
    assert!(!updated.contains("Unreleased"));
    assert!(updated.ends_with(
        "[1.1.0]: https://github.com/org/repo/compare/v1.0.0...v1.1.0\n\
         [1.0.0]: https://github.com/org/repo/releases/tag/v1.0.0\n"
    ));

    let outputs = fs::read_to_string(&output).unwrap();
    assert!(outputs.contains("pr_title=Prepare for version `1.1.0`\n"));
    assert!(outputs.contains("commit_message=Update CHANGELOG for version `1.1.0`\n"));
}

#[test]
fn test_update_changelog_without_time_zone_logs_notice() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), CANONICAL);

    bumpchanges()
        .args(["update-changelog", &path, URL, "1.1.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "::notice::No time zone provided, defaulting to UTC",
        ));
}

#[test]
fn test_update_changelog_rejects_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_changelog(temp_dir.path(), "# Changelog\n\nNothing released yet.\n");

    bumpchanges()
        .args(["update-changelog", &path, URL, "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("::error::Could not parse changelog"))
        .stderr(predicate::str::contains("No versions!"));
}

#[test]
fn test_update_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("_version.py"), "__version__ = \"0.1.0\"\n").unwrap();
    let root = temp_dir.path().to_string_lossy().into_owned();

    bumpchanges()
        .args(["update-files", &root, "0.2.0", "_version.py"])
        .assert()
        .success()
        .stderr(predicate::str::contains("::notice::Version updated in"));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("_version.py")).unwrap(),
        "__version__ = \"0.2.0\"\n"
    );

    bumpchanges()
        .args(["update-files", &root, "0.2.0"])
        .assert()
        .success();

    bumpchanges()
        .args(["update-files", &root, "0.2.0", ".github/version.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("protected folder"));
}
