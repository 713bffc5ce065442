//! Error types for document normalization and chunking
//!
//! Only contract violations surface as errors. Malformed HTML, content that
//! cannot be split below the size ceiling and unmatched citations all degrade
//! gracefully with a logged warning instead.

use thiserror::Error;

/// Result type alias for chunking operations
pub type ChunkerResult<T> = Result<T, ChunkerError>;

/// Error types for chunking operations
#[derive(Debug, Error)]
pub enum ChunkerError {
    /// Input record was not a JSON object
    #[error("'input' must be an object, got {found}")]
    NotAMapping { found: &'static str },

    /// Input record was an object but a required field was missing or mistyped
    #[error("Invalid document record: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// Forced split level deeper than the splitter supports
    #[error("'target_heading_level' must be <= 2, got {0}")]
    InvalidHeadingLevel(u8),

    /// Size ceiling below the size target
    #[error("'max_chunk_size' ({max}) must not be smaller than 'target_chunk_size' ({target})")]
    InvalidChunkSizes { target: usize, max: usize },

    /// Any of the above, tagged with the document that triggered it
    #[error("Failed to process document '{name}': {source}")]
    Document {
        name: String,
        source: Box<ChunkerError>,
    },
}

impl ChunkerError {
    /// Attach the failing document's name, unless one is already attached.
    #[must_use]
    pub fn for_document(self, name: impl Into<String>) -> Self {
        match self {
            already @ Self::Document { .. } => already,
            other => Self::Document {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any document tag removed.
    pub fn root(&self) -> &ChunkerError {
        match self {
            Self::Document { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
