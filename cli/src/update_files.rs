use crate::error::{CliError, Result};
use crate::ui;
use std::path::Path;

pub fn execute(repo_root: &Path, version: &str, files: &str) -> Result<()> {
    if files.trim().is_empty() {
        tracing::debug!("No version files need to be updated");
        return Ok(());
    }

    let updated = version::update_files(repo_root, version, files).map_err(|err| {
        tracing::error!("Error updating files");
        CliError::from(err)
    })?;

    ui::success_message(&format!(
        "Set version {version} in {} file(s)",
        updated.len()
    ));
    Ok(())
}
