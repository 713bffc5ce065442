//! Last-resort splitting by lines
//!
//! Used once no structural boundary is left. A chunk above the ceiling is
//! cut in two at a blank line, between two tables, or between rows of its
//! single table, and each half is split again. Table halves repeat the
//! table header (and everything before it) so every piece stays readable.
//! A table too short to cut stays whole while the prose around it is cut
//! at blank lines.
//!
//! When no legal cut exists the chunk is returned as is, above the ceiling.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use super::Chunk;
use crate::utils::{TABLE_END_MARKER, TABLE_START_MARKER, is_atx_heading, nearest, token_length};

static IMPLICIT_HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*(.*)\*\*$").expect("BUG: hardcoded IMPLICIT_HEADING_LINE regex is statically valid")
});

fn oversized(lines: &[&str], reason: &str, max_chunk_size: usize) -> Vec<Chunk> {
    let chunk = Chunk::new(lines.join("\n"));
    tracing::warn!(
        tokens = chunk.token_length,
        max_chunk_size,
        "{reason}, keeping oversized chunk"
    );
    vec![chunk]
}

/// Split `markdown` by lines until every piece is at most `max_chunk_size` tokens.
pub(crate) fn destructive_split_to_chunks(markdown: &str, max_chunk_size: usize) -> Vec<Chunk> {
    if token_length(markdown) <= max_chunk_size {
        return vec![Chunk::new(markdown.to_string())];
    }

    let lines: Vec<&str> = markdown.lines().collect();
    let tables = lines.iter().filter(|l| **l == TABLE_START_MARKER).count();
    match tables {
        0 => split_no_tables(&lines, max_chunk_size),
        1 => split_single_table(&lines, max_chunk_size),
        _ => split_multiple_tables(&lines, max_chunk_size),
    }
}

/// Cut `lines` at `split`.
///
/// The top half keeps everything before `split` plus the common footer
/// starting at `footer`. The bottom half keeps the common header ending at
/// `header_end` plus everything from `split` on.
fn split_lines_in_two(
    lines: &[&str],
    split: usize,
    header_end: usize,
    footer: usize,
    max_chunk_size: usize,
) -> Vec<Chunk> {
    if !(header_end < split && split < footer && footer <= lines.len()) {
        return oversized(lines, "No split point between header and footer", max_chunk_size);
    }

    let top: Vec<&str> = lines[..split].iter().chain(&lines[footer..]).copied().collect();
    let bottom: Vec<&str> = lines[..header_end].iter().chain(&lines[split..]).copied().collect();

    let mut chunks = destructive_split_to_chunks(&top.join("\n"), max_chunk_size);
    chunks.extend(destructive_split_to_chunks(&bottom.join("\n"), max_chunk_size));
    chunks
}

fn is_heading_or_blank(line: &str) -> bool {
    line.trim().is_empty() || is_atx_heading(line) || IMPLICIT_HEADING_LINE.is_match(line)
}

fn split_no_tables(lines: &[&str], max_chunk_size: usize) -> Vec<Chunk> {
    split_at_blank_line(lines, None, "Only one paragraph left", max_chunk_size)
}

/// Cut at the blank line closest to the middle of the content, never
/// inside `keep_together`.
///
/// Leading headings are the common header of both halves.
fn split_at_blank_line(
    lines: &[&str],
    keep_together: Option<RangeInclusive<usize>>,
    reason: &str,
    max_chunk_size: usize,
) -> Vec<Chunk> {
    let content_start = lines
        .iter()
        .position(|line| !is_heading_or_blank(line))
        .unwrap_or(lines.len());

    let last = lines.len().saturating_sub(1);
    let blank_lines: Vec<usize> = (content_start..last)
        .filter(|&i| lines[i].trim().is_empty())
        .filter(|i| !keep_together.as_ref().is_some_and(|range| range.contains(i)))
        .collect();

    let middle = ((content_start + lines.len()) / 2) as f64;
    match nearest(&blank_lines, middle) {
        Some(blank) => split_lines_in_two(lines, blank + 1, content_start, lines.len(), max_chunk_size),
        None => oversized(lines, reason, max_chunk_size),
    }
}

/// Cut after the table end marker closest to the middle of the table run.
///
/// Text before the first table is the common header, text after the last
/// table the common footer.
fn split_multiple_tables(lines: &[&str], max_chunk_size: usize) -> Vec<Chunk> {
    let Some(first_start) = lines.iter().position(|l| *l == TABLE_START_MARKER) else {
        return oversized(lines, "Missing table start marker", max_chunk_size);
    };
    let ends: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| **l == TABLE_END_MARKER)
        .map(|(i, _)| i)
        .collect();
    let Some(&last_end) = ends.last() else {
        return oversized(lines, "Missing table end marker", max_chunk_size);
    };
    let footer = last_end + 1;

    // Cutting after the last table would leave the top half unchanged
    let candidates: Vec<usize> = ends
        .iter()
        .copied()
        .filter(|&end| end >= first_start && end < last_end)
        .collect();
    let middle = (first_start + footer) as f64 / 2.0;
    match nearest(&candidates, middle) {
        Some(end) => split_lines_in_two(lines, end + 1, first_start, footer, max_chunk_size),
        None => oversized(lines, "No table boundary to split at", max_chunk_size),
    }
}

/// Separator row under a table header, e.g. `| - | - |`
fn is_separator_row(line: &str) -> bool {
    line.starts_with("| -") && line.chars().all(|c| matches!(c, '|' | '-' | ' '))
}

/// Cut between the rows of the only table, at a subheader when there are
/// several, else in the middle. The table header is repeated in both halves.
fn split_single_table(lines: &[&str], max_chunk_size: usize) -> Vec<Chunk> {
    let (Some(start_marker), Some(end)) = (
        lines.iter().position(|l| *l == TABLE_START_MARKER),
        lines.iter().position(|l| *l == TABLE_END_MARKER),
    ) else {
        return oversized(lines, "Unbalanced table markers", max_chunk_size);
    };
    let table_start = start_marker + 1;
    if end < table_start {
        return oversized(lines, "Unbalanced table markers", max_chunk_size);
    }

    let mut rows_start = (table_start..end)
        .find(|&i| is_separator_row(lines[i]))
        .map_or(table_start + 1, |i| i + 1);

    // A subheader row sits directly above its own separator
    let subheaders: Vec<usize> = (rows_start..end)
        .filter(|&i| is_separator_row(lines[i]))
        .map(|i| i - 1)
        .collect();
    if let [only] = subheaders.as_slice() {
        rows_start = only + 2;
    }

    if end <= rows_start + 1 {
        // Table cannot shrink, cut the prose around it instead
        return split_at_blank_line(
            lines,
            Some(start_marker..=end),
            "Only one table row left",
            max_chunk_size,
        );
    }

    let split = if subheaders.len() > 1 {
        let inner: Vec<usize> = subheaders
            .iter()
            .copied()
            .filter(|&i| i > rows_start && i < end)
            .collect();
        nearest(&inner, (rows_start + end) as f64 / 2.0).unwrap_or((rows_start + end) / 2)
    } else {
        (rows_start + end) / 2
    };
    split_lines_in_two(lines, split, rows_start, end, max_chunk_size)
}
