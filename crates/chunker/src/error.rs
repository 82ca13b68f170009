use thiserror::Error;

/// Result type for chunking operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while chunking a document
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// The caller cancelled the operation; partial output is discarded
    #[error("Chunking cancelled")]
    Cancelled,

    /// Content could not be interpreted by a format chunker
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chunker produced chunks that violate the offset contract
    #[error("Invalid chunk boundaries: start={start}, end={end}")]
    InvalidBoundaries { start: usize, end: usize },

    /// No registered chunker accepts the content and no fallback is set
    #[error("No chunker available for mime type '{mime_type}' and language '{language}'")]
    NoChunker { mime_type: String, language: String },

    /// Every candidate, including the fallback, failed
    #[error("All {attempts} chunker attempts failed, last error: {last_error}")]
    AllChunkersFailed { attempts: usize, last_error: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ChunkerError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error should stop the dispatcher instead of trying the next chunker
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
