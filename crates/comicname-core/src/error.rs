use thiserror::Error;

/// Errors that can occur during comicname core operations.
///
/// Parsing itself never fails for string input; these cover construction,
/// dictionary loading and rename templates.
#[derive(Debug, Error)]
pub enum ComicnameError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The word-break dictionary could not be read.
    #[error("failed to load word dictionary: {0}")]
    DictionaryLoad(#[from] std::io::Error),

    /// A rename template references an unknown field or is malformed.
    #[error("invalid rename template: {0}")]
    InvalidTemplate(String),

    /// A parser configuration could not be decoded or is inconsistent.
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for comicname operations.
pub type Result<T> = std::result::Result<T, ComicnameError>;
