use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use version::version_to_tag;

use crate::cli::WorkflowArgs;
use crate::error::{CliError, Result, ResultExt};

fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    value.ok_or(CliError::MissingEnvironment(name))
}

/// Markdown body of the release pull request
pub fn pr_body(version: &str, workflow: &WorkflowArgs) -> Result<String> {
    let actor = require(workflow.actor.as_deref(), "GITHUB_ACTOR")?;
    let triggering_actor = workflow.triggering_actor.as_deref().unwrap_or(actor);
    let ref_name = require(workflow.ref_name.as_deref(), "GITHUB_REF_NAME")?;
    let bump_type = require(workflow.bump_type.as_deref(), "BUMP_TYPE")?;

    let mut rows = vec![("Actor", format!("@{actor}"))];
    if triggering_actor != actor {
        rows.push(("Triggering Actor", format!("@{triggering_actor}")));
    }
    rows.push(("Branch", format!("`{ref_name}`")));
    rows.push(("Bump Type", format!("`{bump_type}`")));
    if bump_type == "exact" {
        let exact = require(workflow.exact_version.as_deref(), "EXACT_VERSION")?;
        rows.push(("Exact version", exact.to_string()));
    }

    let mut body = format!(
        "Update CHANGELOG in preparation for release **{version}**.\n\n\
         Merging this PR will trigger another workflow to create the release tag **{}**.\n\n\
         | Input | Value |\n\
         | ----- | ----- |\n",
        version_to_tag(version)
    );
    for (key, value) in rows {
        body.push_str(&format!("| {key} | {value} |\n"));
    }
    Ok(body)
}

/// `key=value` lines for the step outputs
pub fn outputs(version: &str, body_file: &Path) -> String {
    format!(
        "pr_bodyfile={}\npr_title=Prepare for version `{version}`\ncommit_message=Update CHANGELOG for version `{version}`\n",
        body_file.display()
    )
}

fn write_body(workspace: &Path, body: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("pr-body-")
        .suffix(".md")
        .tempfile_in(workspace)
        .with_context(|| format!("Failed to create body file in {}", workspace.display()))?;
    file.write_all(body.as_bytes())?;

    let (_, path) = file.keep().map_err(io::Error::from)?;
    Ok(path)
}

/// Write the pull request body file and the workflow step outputs. Does
/// nothing outside a workflow, where `GITHUB_OUTPUT` is unset.
pub fn write(version: &str, workflow: &WorkflowArgs) -> Result<()> {
    let Some(output) = workflow.github_output.as_deref() else {
        tracing::debug!("GITHUB_OUTPUT is not set, skipping commit details");
        return Ok(());
    };
    let workspace = workflow
        .github_workspace
        .as_deref()
        .ok_or(CliError::MissingEnvironment("GITHUB_WORKSPACE"))?;

    let body_file = write_body(workspace, &pr_body(version, workflow)?)?;
    tracing::debug!("Wrote pull request body to {}", body_file.display());

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .and_then(|mut file| file.write_all(outputs(version, &body_file).as_bytes()))
        .with_context(|| format!("Failed to write outputs to {}", output.display()))
}
