//! Getter methods for the configuration types

use super::types::{ChunkingConfig, NormalizerConfig};

impl NormalizerConfig {
    #[must_use]
    pub fn pad_columns(&self) -> bool {
        self.pad_columns
    }

    #[must_use]
    pub fn blacklist_elements(&self) -> &[String] {
        &self.blacklist_elements
    }

    #[must_use]
    pub fn allowlist_attributes(&self) -> &[String] {
        &self.allowlist_attributes
    }

    #[must_use]
    pub fn max_cell_chars(&self) -> usize {
        self.max_cell_chars
    }

    /// Whether elements named `name` are dropped during cleaning
    #[must_use]
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist_elements.iter().any(|e| e.eq_ignore_ascii_case(name))
    }

    /// Whether attributes named `name` survive cleaning
    #[must_use]
    pub fn is_allowed_attribute(&self, name: &str) -> bool {
        self.allowlist_attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn target_chunk_size(&self) -> usize {
        self.target_chunk_size
    }

    #[must_use]
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    #[must_use]
    pub fn target_heading_level(&self) -> u8 {
        self.target_heading_level
    }
}
