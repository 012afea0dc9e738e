//! Error types for callgraph-prep
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for preprocessing operations
#[derive(Debug, Error)]
pub enum PrepError {
    /// The parsing toolchain rejected the source
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal pipeline failure
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// A preprocessor name outside the supported set
    #[error("Unknown preprocessor: {0}")]
    UnknownPreprocessor(String),
}

impl PrepError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        PrepError::Parse(msg.into())
    }

    /// Create a pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        PrepError::Pipeline(msg.into())
    }
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PrepError>;
