//! Shared configuration constants for docchunk
//!
//! This module contains default values and marker strings used throughout
//! the normalizer and the splitter so both sides agree on them.

/// Default target chunk size: 1500 tokens
///
/// Chunks are assembled until adding the next section would exceed this.
/// Retrieval pipelines with small embedding windows usually pass 512.
pub const DEFAULT_TARGET_CHUNK_SIZE: usize = 1500;

/// Default hard ceiling on chunk size: 2500 tokens
///
/// Only the destructive line splitter is allowed to produce chunks above
/// this, and only when no legal split point exists.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2500;

/// Default heading level that forces a chunk boundary (0 = document title only)
pub const DEFAULT_TARGET_HEADING_LEVEL: u8 = 0;

/// Deepest heading level callers may request as a forced boundary
pub const MAX_TARGET_HEADING_LEVEL: u8 = 2;

/// Characters per token in the length heuristic
pub const CHARS_PER_TOKEN: usize = 5;

/// A table cell with at least this many characters makes the table layout-only
///
/// Such tables are flattened into their text instead of being rendered
/// as a markdown table.
pub const DEFAULT_MAX_CELL_CHARS: usize = 1000;

/// Upper bound for `rowspan`/`colspan` values
///
/// Browsers accept up to 65534 but duplicating that many cells blows up
/// memory on malformed input.
pub const MAX_CELL_SPAN: usize = 100;

/// How many lines below a citation reference to look for its footnote
pub const CITATION_LOOKAHEAD_LINES: usize = 10;

/// Longest run of escaped asterisks treated as a citation reference
pub const MAX_CITATION_STARS: usize = 10;

pub const TABLE_START_MARKER: &str = "START TABLE IN MARKDOWN";
pub const TABLE_END_MARKER: &str = "END TABLE IN MARKDOWN";
pub const SECTION_START_MARKER: &str = "START SECTION";
pub const SECTION_END_MARKER: &str = "END SECTION";

/// Elements removed together with their subtree during cleaning
pub const DEFAULT_BLACKLIST_ELEMENTS: &[&str] = &[
    "title", "head", "meta", "link", "script", "style", "button", "img",
];

/// Attributes that survive cleaning; every other attribute is dropped
pub const DEFAULT_ALLOWLIST_ATTRIBUTES: &[&str] = &["colspan", "rowspan"];
