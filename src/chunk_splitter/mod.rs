//! Markdown → token-bounded chunks
//!
//! Documents are split along their heading structure. Headings above the
//! target level always start a new chunk. Sections cut at the target level
//! are merged with their neighbours up to the target size. Oversized chunks
//! are re-split with progressively finer boundaries (see
//! [`policy::SplitPolicy`]). Tables are never cut mid-row, and cut tables
//! repeat their header.
//!
//! Every finished chunk is cleaned up: section markers removed, heading
//! spacing normalized, footnote citations inlined, and a title H1 built from
//! the document's `source`.

pub mod blocks;
pub mod policy;
pub mod postprocess;

mod assembler;
mod destructive;

pub use postprocess::{fix_citations, normalize_newlines, prepend_title, strip_section_markers};

use serde_json::Value;

use crate::config::ChunkingConfig;
use crate::document::{ChunkRecord, MarkdownDocument};
use crate::error::ChunkerResult;
use crate::utils::token_length;
use policy::SplitPolicy;

/// A piece of markdown with its estimated token count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub token_length: usize,
}

impl Chunk {
    pub fn new(text: String) -> Self {
        Self {
            token_length: token_length(&text),
            text,
        }
    }
}

/// Split raw markdown without post-processing.
///
/// Chunks come out in document order. Only chunks that no structural or
/// line-level split could reduce exceed `max_chunk_size`.
///
/// # Errors
///
/// Returns an error if `config` fails [`ChunkingConfig::validate`].
pub fn split_markdown(markdown: &str, config: &ChunkingConfig) -> ChunkerResult<Vec<Chunk>> {
    config.validate()?;
    Ok(assembler::do_split_to_chunks(
        markdown,
        config,
        SplitPolicy::starting_at(config.target_heading_level()),
    ))
}

/// Split a markdown document into cleaned-up chunk records.
///
/// Records inherit the document's name, source and metadata. Chunks left
/// empty by the cleanup are dropped; `chunk_index` counts the remaining ones.
///
/// # Errors
///
/// Returns an error if `config` fails [`ChunkingConfig::validate`].
pub fn split_to_chunks(
    document: &MarkdownDocument,
    config: &ChunkingConfig,
) -> ChunkerResult<Vec<ChunkRecord>> {
    let chunks = split_markdown(&document.text, config)?;
    let raw_count = chunks.len();

    let records: Vec<ChunkRecord> = chunks
        .into_iter()
        .map(|chunk| postprocess::finalize_chunk_text(&chunk.text, &document.source))
        .filter(|text| !text.trim().is_empty())
        .enumerate()
        .map(|(index, text)| ChunkRecord::new(document, index, text))
        .collect();

    let oversized = records
        .iter()
        .filter(|r| r.token_length > config.max_chunk_size())
        .count();
    tracing::debug!(
        name = %document.name,
        chunks = records.len(),
        dropped = raw_count - records.len(),
        oversized,
        "Split document into chunks"
    );
    Ok(records)
}

/// [`split_to_chunks`] for untyped JSON records.
///
/// # Errors
///
/// - [`crate::ChunkerError::NotAMapping`] if `value` is not a JSON object
/// - [`crate::ChunkerError::InvalidDocument`] if `text`, `name` or `source` is missing
/// - [`crate::ChunkerError::InvalidHeadingLevel`] / [`crate::ChunkerError::InvalidChunkSizes`]
///   for an invalid `config`
pub fn split_to_chunks_value(value: Value, config: &ChunkingConfig) -> ChunkerResult<Vec<ChunkRecord>> {
    let document = MarkdownDocument::try_from(value)?;
    split_to_chunks(&document, config).map_err(|e| e.for_document(&document.name))
}
