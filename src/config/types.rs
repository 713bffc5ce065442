//! Core configuration types for normalization and chunking
//!
//! Both structs deserialize with defaults for every missing field so a
//! partial JSON config (or none at all) yields the standard behaviour.

use serde::{Deserialize, Serialize};

use crate::utils::{
    DEFAULT_ALLOWLIST_ATTRIBUTES, DEFAULT_BLACKLIST_ELEMENTS, DEFAULT_MAX_CELL_CHARS,
    DEFAULT_MAX_CHUNK_SIZE, DEFAULT_TARGET_CHUNK_SIZE, DEFAULT_TARGET_HEADING_LEVEL,
};

/// Settings for the HTML → markdown normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Pad table cells to a fixed width per column
    pub(crate) pad_columns: bool,
    /// Elements removed together with their subtree
    pub(crate) blacklist_elements: Vec<String>,
    /// Attributes kept on surviving elements
    pub(crate) allowlist_attributes: Vec<String>,
    /// Cell length (in characters) that marks a table as layout-only
    pub(crate) max_cell_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            pad_columns: false,
            blacklist_elements: DEFAULT_BLACKLIST_ELEMENTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            allowlist_attributes: DEFAULT_ALLOWLIST_ATTRIBUTES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_cell_chars: DEFAULT_MAX_CELL_CHARS,
        }
    }
}

/// Settings for the markdown chunk splitter
///
/// Sizes are in tokens as estimated by [`crate::utils::token_length`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub(crate) target_chunk_size: usize,
    pub(crate) max_chunk_size: usize,
    /// Headings at or above this level always start a new chunk (0..=2)
    pub(crate) target_heading_level: u8,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chunk_size: DEFAULT_TARGET_CHUNK_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            target_heading_level: DEFAULT_TARGET_HEADING_LEVEL,
        }
    }
}
