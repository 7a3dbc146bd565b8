use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Version regex not found in {}", .0.display())]
    VersionNotFound(PathBuf),

    #[error("Multiple versions ({count}) changed in {path}", count = .1, path = .0.display())]
    MultipleVersions(PathBuf, usize),

    #[error("Version file {0} is not within the repository")]
    OutsideRepository(String),

    #[error("Version file {0} is within a protected folder")]
    ProtectedPath(String),

    #[error("Version file {0} does not exist")]
    MissingFile(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<VersionError>),
}

impl VersionError {
    /// Add context to an error
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        VersionError::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VersionError::VersionNotFound(path) => {
                format!("Could not find a version assignment in {}", path.display())
            }
            VersionError::MultipleVersions(path, count) => format!(
                "Found {count} version assignments in {}, expected exactly one",
                path.display()
            ),
            VersionError::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
            _ => format!("{self}"),
        }
    }
}

pub type Result<T> = result::Result<T, VersionError>;

// Helper trait for adding context to results
pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for result::Result<T, E>
where
    E: Into<VersionError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let version_err: VersionError = err.into();
            version_err.with_context(context())
        })
    }
}
