use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bumpchanges")]
#[command(
    author,
    version,
    about = "Release bookkeeping for CHANGELOG.md and version files"
)]
pub struct Cli {
    /// Log line style
    #[clap(
        long,
        global = true,
        value_enum,
        env = "BUMPCHANGES_LOG_FORMAT",
        default_value_t = LogFormat::Github
    )]
    pub log_format: LogFormat,

    /// Enable verbose output with additional information
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn the Unreleased section into a dated release and write workflow outputs
    UpdateChangelog {
        /// Path to the CHANGELOG.md file
        changelog: PathBuf,

        /// Repository URL used to build comparison links
        repo_url: String,

        /// Version being released
        version: String,

        /// IANA time zone used to date the release (defaults to UTC)
        #[clap(long, env = "CHANGELOG_TIMEZONE")]
        timezone: Option<String>,

        #[clap(flatten)]
        workflow: WorkflowArgs,
    },

    /// Print a changelog in canonical form
    FormatChangelog {
        /// Path to the CHANGELOG.md file
        changelog: PathBuf,

        /// Repository URL used to build comparison links
        repo_url: String,

        /// Promote the Unreleased section to this version before printing
        #[clap(long = "version", value_name = "VERSION")]
        release: Option<String>,

        /// Fail instead of printing when the file is not already canonical
        #[clap(long, default_value_t = false)]
        check: bool,

        /// IANA time zone used to date a promoted release (defaults to UTC)
        #[clap(long, env = "CHANGELOG_TIMEZONE")]
        timezone: Option<String>,
    },

    /// Rewrite the version assignment in each listed file
    UpdateFiles {
        /// Repository root every file must live under
        repo_root: PathBuf,

        /// Version to write
        version: String,

        /// Comma-separated file paths relative to the repository root
        #[clap(default_value = "")]
        files: String,
    },
}

/// Values GitHub Actions provides to the release workflow
#[derive(Args, Clone, Debug, Default)]
pub struct WorkflowArgs {
    /// File receiving step outputs
    #[clap(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Directory the pull request body file is written to
    #[clap(long, env = "GITHUB_WORKSPACE")]
    pub github_workspace: Option<PathBuf>,

    #[clap(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    #[clap(long, env = "GITHUB_TRIGGERING_ACTOR")]
    pub triggering_actor: Option<String>,

    #[clap(long, env = "GITHUB_REF_NAME")]
    pub ref_name: Option<String>,

    #[clap(long, env = "BUMP_TYPE")]
    pub bump_type: Option<String>,

    #[clap(long, env = "EXACT_VERSION")]
    pub exact_version: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// GitHub Actions workflow commands such as `::warning::`
    Github,

    /// Plain `level: message` lines
    Plain,
}
