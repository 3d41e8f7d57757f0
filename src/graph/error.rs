//! Error types shared by nodes, triples and graphs

use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The graph (or node variant) does not provide the requested capability
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Malformed construction input (bad URI, language tag, label, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The graph has been closed
    #[error("Graph is closed")]
    Closed,

    /// An internal defect, never a user error
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl GraphError {
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        GraphError::UnsupportedOperation(what.into())
    }

    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        GraphError::InvalidArgument(what.into())
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
