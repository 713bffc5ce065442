//! Document records flowing through the pipeline
//!
//! Every record carries the caller's extra keys in `metadata`. They are
//! flattened on (de)serialization, so a record read from JSON is written
//! back with the same keys plus whatever the stage adds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ChunkerError, json_kind};
use crate::utils::token_length;

/// Raw input: one HTML document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    /// Raw HTML
    pub content: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }
}

/// Normalized markdown produced from a [`SourceDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownDocument {
    pub name: String,
    pub source: String,
    pub text: String,
    #[serde(default)]
    pub token_length: usize,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl MarkdownDocument {
    /// Build from `source` with `text` replacing its HTML content.
    pub fn from_source(source: SourceDocument, text: String) -> Self {
        let SourceDocument {
            name,
            source,
            metadata,
            ..
        } = source;
        Self {
            name,
            source,
            token_length: token_length(&text),
            text,
            metadata,
        }
    }
}

/// One chunk of a [`MarkdownDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub name: String,
    pub source: String,
    pub text: String,
    pub token_length: usize,
    /// Zero-based position of this chunk within its document
    pub chunk_index: usize,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ChunkRecord {
    pub fn new(document: &MarkdownDocument, chunk_index: usize, text: String) -> Self {
        Self {
            name: document.name.clone(),
            source: document.source.clone(),
            token_length: token_length(&text),
            text,
            chunk_index,
            metadata: document.metadata.clone(),
        }
    }
}

fn object_or_error(value: Value) -> Result<Value, ChunkerError> {
    match value {
        object @ Value::Object(_) => Ok(object),
        other => Err(ChunkerError::NotAMapping {
            found: json_kind(&other),
        }),
    }
}

impl TryFrom<Value> for SourceDocument {
    type Error = ChunkerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(object_or_error(value)?)?)
    }
}

impl TryFrom<Value> for MarkdownDocument {
    type Error = ChunkerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut document: Self = serde_json::from_value(object_or_error(value)?)?;
        // Stored lengths may come from a different estimator
        document.token_length = token_length(&document.text);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_input_is_a_type_error() {
        let err = SourceDocument::try_from(json!(["<p>x</p>"])).unwrap_err();
        assert!(matches!(err, ChunkerError::NotAMapping { found: "array" }));
        let err = MarkdownDocument::try_from(json!("text")).unwrap_err();
        assert!(matches!(err, ChunkerError::NotAMapping { found: "string" }));
    }

    #[test]
    fn missing_content_is_reported() {
        let err = SourceDocument::try_from(json!({"name": "a"})).unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidDocument(_)));
    }

    #[test]
    fn extra_keys_survive_into_chunks() -> anyhow::Result<()> {
        let source = SourceDocument::try_from(json!({
            "name": "guide",
            "source": "https://example.com/guide",
            "content": "<p>hi</p>",
            "lang": "en",
        }))?;
        assert_eq!(source.metadata.get("lang"), Some(&json!("en")));

        let markdown = MarkdownDocument::from_source(source, "0123456789".to_string());
        assert_eq!(markdown.token_length, 2);

        let chunk = ChunkRecord::new(&markdown, 3, "abcde".to_string());
        let value = serde_json::to_value(&chunk)?;
        assert_eq!(value["lang"], json!("en"));
        assert_eq!(value["chunk_index"], json!(3));
        assert_eq!(value["token_length"], json!(1));
        assert!(value.get("content").is_none());
        Ok(())
    }
}
