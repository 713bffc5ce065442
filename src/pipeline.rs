//! End-to-end processing: HTML documents in, chunk records out
//!
//! Documents are independent of each other, so batches are processed on the
//! rayon pool. Results keep input order and one failing document never
//! aborts the rest of the batch.

use rayon::prelude::*;
use serde_json::Value;
use std::time::Instant;

use crate::chunk_splitter::split_to_chunks;
use crate::config::{ChunkingConfig, NormalizerConfig};
use crate::document::{ChunkRecord, SourceDocument};
use crate::error::ChunkerResult;
use crate::html_normalizer::convert_html_to_md;

/// Normalize one HTML document and split it into chunks.
///
/// # Errors
///
/// Returns [`crate::ChunkerError::Document`] wrapping the configuration error
/// if `chunking` is invalid.
pub fn process_document(
    document: SourceDocument,
    normalizer: &NormalizerConfig,
    chunking: &ChunkingConfig,
) -> ChunkerResult<Vec<ChunkRecord>> {
    let name = document.name.clone();
    chunking.validate().map_err(|e| e.for_document(&name))?;

    let markdown = convert_html_to_md(document, normalizer);
    split_to_chunks(&markdown, chunking).map_err(|e| e.for_document(name))
}

/// [`process_document`] over a batch, in parallel.
///
/// The returned vector is index-aligned with `documents`.
pub fn process_documents(
    documents: Vec<SourceDocument>,
    normalizer: &NormalizerConfig,
    chunking: &ChunkingConfig,
) -> Vec<ChunkerResult<Vec<ChunkRecord>>> {
    let start = Instant::now();
    let total = documents.len();

    let results: Vec<_> = documents
        .into_par_iter()
        .map(|document| process_document(document, normalizer, chunking))
        .collect();

    log_batch_summary(&results, total, start);
    results
}

/// [`process_documents`] for untyped JSON records.
///
/// Records that are not objects or lack `content` fail individually with
/// [`crate::ChunkerError::NotAMapping`] or [`crate::ChunkerError::InvalidDocument`].
pub fn process_json_documents(
    values: Vec<Value>,
    normalizer: &NormalizerConfig,
    chunking: &ChunkingConfig,
) -> Vec<ChunkerResult<Vec<ChunkRecord>>> {
    let start = Instant::now();
    let total = values.len();

    let results: Vec<_> = values
        .into_par_iter()
        .enumerate()
        .map(|(index, value)| {
            let document = SourceDocument::try_from(value)
                .map_err(|e| e.for_document(format!("#{index}")))?;
            process_document(document, normalizer, chunking)
        })
        .collect();

    log_batch_summary(&results, total, start);
    results
}

fn log_batch_summary(results: &[ChunkerResult<Vec<ChunkRecord>>], total: usize, start: Instant) {
    let failed = results.iter().filter(|r| r.is_err()).count();
    let chunks: usize = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(Vec::len)
        .sum();

    if failed > 0 {
        tracing::warn!(failed, total, "Some documents failed to process");
    }
    tracing::info!(
        documents = total,
        chunks,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Processed document batch"
    );
}
