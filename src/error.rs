//! Error type for edit operations

use thiserror::Error;

/// Errors surfaced synchronously by the editing core. The buffer is never
/// modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Line or column outside the document, passed to a non-clamping entry point
    #[error("position {line}:{column} is out of range")]
    OutOfRange { line: isize, column: isize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Rejected search/replace terms
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Text would exceed the configured character ceiling
    #[error("{requested} characters exceeds the limit of {limit}")]
    TooLarge { requested: usize, limit: usize },

    /// Allocation failed even after dropping the undo history
    #[error("could not allocate room for {requested} lines")]
    Allocation { requested: usize },
}

pub type Result<T, E = EditError> = std::result::Result<T, E>;
