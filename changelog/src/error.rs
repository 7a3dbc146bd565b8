use thiserror::Error;

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read or write changelog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The document does not fit the changelog schema
    #[error("Invalid changelog structure: {0}")]
    Structure(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

impl ChangelogError {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Whether the error, ignoring context, is a schema violation
    #[must_use]
    pub fn is_structure(&self) -> bool {
        match self {
            Self::Structure(_) => true,
            Self::WithContext(_, err) => err.is_structure(),
            Self::ReadError(_) => false,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ReadError(e) => format!("File operation failed: {e}"),
            Self::Structure(msg) => format!("Changelog is not in the expected format: {msg}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}
