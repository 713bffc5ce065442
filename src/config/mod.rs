//! Configuration module for normalization and chunking
//!
//! [`NormalizerConfig`] controls HTML cleaning and table rendering,
//! [`ChunkingConfig`] controls chunk sizes and forced heading boundaries.

// Sub-modules
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use types::{ChunkingConfig, NormalizerConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkerError;

    #[test]
    fn defaults_match_documented_values() {
        let chunking = ChunkingConfig::default();
        assert_eq!(chunking.target_chunk_size(), 1500);
        assert_eq!(chunking.max_chunk_size(), 2500);
        assert_eq!(chunking.target_heading_level(), 0);

        let normalizer = NormalizerConfig::default();
        assert!(!normalizer.pad_columns());
        assert!(normalizer.is_blacklisted("script"));
        assert!(normalizer.is_blacklisted("IMG"));
        assert!(!normalizer.is_blacklisted("table"));
        assert!(normalizer.is_allowed_attribute("rowspan"));
        assert!(!normalizer.is_allowed_attribute("class"));
    }

    #[test]
    fn heading_level_above_two_is_rejected() {
        let err = ChunkingConfig::new()
            .with_target_heading_level(3)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidHeadingLevel(3)));
        assert!(ChunkingConfig::new().with_target_heading_level(2).validate().is_ok());
    }

    #[test]
    fn ceiling_below_target_is_rejected() {
        let err = ChunkingConfig::new()
            .with_target_chunk_size(600)
            .with_max_chunk_size(500)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ChunkerError::InvalidChunkSizes { target: 600, max: 500 }
        ));
    }

    #[test]
    fn partial_json_fills_in_defaults() -> anyhow::Result<()> {
        let config: ChunkingConfig =
            serde_json::from_str(r#"{"target_chunk_size": 512, "max_chunk_size": 750}"#)?;
        assert_eq!(config.target_chunk_size(), 512);
        assert_eq!(config.max_chunk_size(), 750);
        assert_eq!(config.target_heading_level(), 0);

        let normalizer: NormalizerConfig = serde_json::from_str(r#"{"pad_columns": true}"#)?;
        assert!(normalizer.pad_columns());
        assert!(normalizer.is_blacklisted("style"));
        Ok(())
    }
}
