use crate::error::ChangelogError;
use crate::token::Token;

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Contiguous tokens kept verbatim, such as one list item or one notice
pub type TokenGroup = Vec<Token>;
