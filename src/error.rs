use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Quarry operations
#[derive(Error, Debug)]
pub enum QuarryError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid format in {file}: {reason}")]
    InvalidFormat { file: String, reason: String },

    #[error("truncated file: {file}")]
    TruncatedFile { file: String },

    #[error("term table full at capacity {capacity}; rebuild with a larger hash capacity")]
    TermTableFull { capacity: usize },

    #[error("doc ids out of order for term {term:?}: {prev} followed by {next}")]
    UnorderedDocIds { term: String, prev: u32, next: u32 },

    #[error("unbalanced parentheses in query")]
    UnbalancedParentheses,

    #[error("malformed query expression")]
    MalformedExpression,
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

impl QuarryError {
    /// Attach a path to a raw I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QuarryError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors a user can fix by editing the query rather than the index
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            QuarryError::UnbalancedParentheses | QuarryError::MalformedExpression
        )
    }
}
