//! Version string utilities shared by the changelog engine and the CLI.

mod error;
mod files;
mod tag;

pub use error::{Result, ResultExt, VersionError};
pub use files::{update_file, update_files};
pub use tag::version_to_tag;
