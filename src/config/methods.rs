//! Fluent setters and validation for the configuration types

use crate::error::{ChunkerError, ChunkerResult};
use crate::utils::MAX_TARGET_HEADING_LEVEL;

use super::types::{ChunkingConfig, NormalizerConfig};

impl NormalizerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pad every table cell to the widest cell of its column.
    #[must_use]
    pub fn with_pad_columns(mut self, pad: bool) -> Self {
        self.pad_columns = pad;
        self
    }

    #[must_use]
    pub fn with_blacklist_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_allowlist_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_max_cell_chars(mut self, chars: usize) -> Self {
        self.max_cell_chars = chars;
        self
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target_chunk_size(mut self, tokens: usize) -> Self {
        self.target_chunk_size = tokens;
        self
    }

    #[must_use]
    pub fn with_max_chunk_size(mut self, tokens: usize) -> Self {
        self.max_chunk_size = tokens;
        self
    }

    #[must_use]
    pub fn with_target_heading_level(mut self, level: u8) -> Self {
        self.target_heading_level = level;
        self
    }

    /// Check the settings before any splitting happens.
    ///
    /// # Errors
    ///
    /// - [`ChunkerError::InvalidHeadingLevel`] if the level is deeper than 2
    /// - [`ChunkerError::InvalidChunkSizes`] if the ceiling is below the target
    pub fn validate(&self) -> ChunkerResult<()> {
        if self.target_heading_level > MAX_TARGET_HEADING_LEVEL {
            return Err(ChunkerError::InvalidHeadingLevel(self.target_heading_level));
        }
        if self.max_chunk_size < self.target_chunk_size {
            return Err(ChunkerError::InvalidChunkSizes {
                target: self.target_chunk_size,
                max: self.max_chunk_size,
            });
        }
        Ok(())
    }
}
