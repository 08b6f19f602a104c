//! Error types for query composition.
//!
//! The core composition functions are total. Errors only arise while a nested
//! callback is evaluated, and they leave the enclosing push exactly as raised.

use thiserror::Error;

/// The error type for composition operations.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// A query method was used on a nested builder that only accepts filters.
    ///
    /// Scored clauses make no sense inside a filter unless the enclosing clause
    /// is a join (`nested`, `has_parent`, `has_child`).
    #[error("query clause '{clause_type}' is not allowed inside a filter context")]
    QueryInFilterContext {
        /// The clause type the caller attempted to add.
        clause_type: String,
    },

    /// The composer configuration could not be read.
    #[error("invalid composer configuration: {message}")]
    InvalidConfig {
        /// What was wrong with it.
        message: String,
    },

    /// A failure raised by caller code inside a nested callback.
    #[error(transparent)]
    Callback(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ComposeError {
    /// Wraps an arbitrary caller error so it can be returned from a nested callback.
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ComposeError::Callback(err.into())
    }
}

/// Result type for composition operations.
pub type ComposeResult<T> = Result<T, ComposeError>;
