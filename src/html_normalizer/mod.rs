//! HTML → normalized markdown
//!
//! The pipeline:
//! 1. Simplify whitespace variants in the raw HTML
//! 2. Parse, bracket documentation sections with markers, drop navigation widgets
//! 3. Clean the tree (comments, blacklisted elements, attributes, headings, blank text)
//! 4. Materialize `colspan`, then `rowspan` cells
//! 5. Render data tables to pipe tables, flatten layout tables
//! 6. Render the rest to markdown with ATX headings
//! 7. Normalize marker spacing and strip trailing whitespace
//!
//! # Usage
//!
//! ```rust
//! # use kodegen_tools_docchunk::config::NormalizerConfig;
//! # use kodegen_tools_docchunk::html_normalizer::convert_html_to_md_text;
//! let markdown = convert_html_to_md_text("<h1>Title</h1><p>Body</p>", &NormalizerConfig::default());
//! assert_eq!(markdown, "# Title\n\nBody");
//! ```

pub mod dom;
pub mod html_cleaning;
pub mod markdown_rendering;
pub mod table_conversion;
pub mod table_spans;

pub use html_cleaning::{clean_html, clean_spaces, parse_fragment, simplify_whitespace};
pub use markdown_rendering::{normalize_markers, remove_trailing_whitespace, render_markdown};
pub use table_conversion::{
    TableBlocks, convert_tables_to_markdown, destruct_table, render_table_markdown,
    should_destruct_table,
};
pub use table_spans::{expand_table_colspan, expand_table_rowspan};

use serde_json::Value;

use crate::config::NormalizerConfig;
use crate::document::{MarkdownDocument, SourceDocument};
use crate::error::ChunkerResult;

/// Convert an HTML string to normalized markdown.
///
/// Never fails: if the markdown renderer errors, the document's plain text
/// is used instead and a warning is logged.
pub fn convert_html_to_md_text(html: &str, config: &NormalizerConfig) -> String {
    // Stage 1: Whitespace variants (NBSP, U+2028, CRLF, ...) to plain forms
    let html = simplify_whitespace(html);

    // Stage 2: Parse with section markers, without navigation widgets
    let nodes = parse_fragment(&html);

    // Stage 3: Clean
    let nodes = clean_html(nodes, config);

    // Stage 4: Spanned cells, columns first
    let nodes = expand_table_rowspan(expand_table_colspan(nodes));

    // Stage 5: Tables
    let (nodes, tables) = convert_tables_to_markdown(nodes, config);
    tracing::debug!(tables = tables.len(), "Converted tables to markdown");

    // Stage 6: Markdown rendering (fallback: plain text)
    let html = markdown_rendering::pad_spans(&dom::to_html(&nodes));
    let markdown = match render_markdown(&html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown rendering failed: {}, using plain text", e);
            dom::text_content(&nodes)
        }
    };
    let markdown = tables.restore(&markdown);

    // Stage 7: Marker spacing and trailing whitespace
    let markdown = normalize_markers(&markdown);
    remove_trailing_whitespace(&markdown)
        .trim_matches('\n')
        .to_string()
}

/// Convert a source record to a markdown record.
///
/// The HTML `content` is replaced by `text`, with `token_length` computed
/// from it. Every other key of the record is kept.
pub fn convert_html_to_md(document: SourceDocument, config: &NormalizerConfig) -> MarkdownDocument {
    let text = convert_html_to_md_text(&document.content, config);
    tracing::debug!(
        name = %document.name,
        html_len = document.content.len(),
        markdown_len = text.len(),
        "Converted document to markdown"
    );
    MarkdownDocument::from_source(document, text)
}

/// [`convert_html_to_md`] for untyped JSON records.
///
/// # Errors
///
/// - [`crate::ChunkerError::NotAMapping`] if `value` is not a JSON object
/// - [`crate::ChunkerError::InvalidDocument`] if `content` is missing or not a string
pub fn convert_html_to_md_value(value: Value, config: &NormalizerConfig) -> ChunkerResult<MarkdownDocument> {
    let document = SourceDocument::try_from(value)?;
    Ok(convert_html_to_md(document, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_table_becomes_inline_text() {
        let markdown = convert_html_to_md_text(
            "<table><tr><td>A</td><td>B</td></tr></table>",
            &NormalizerConfig::default(),
        );
        assert_eq!(markdown, "A B");
        assert!(!markdown.contains("TABLE IN MARKDOWN"));
    }

    #[test]
    fn data_table_is_bracketed_by_markers() {
        let markdown = convert_html_to_md_text(
            "<p>Intro</p><table><tr><th>K</th><th>V</th></tr><tr><td>a</td><td>1</td></tr><tr><td>b</td><td>2</td></tr></table><p>Outro</p>",
            &NormalizerConfig::default(),
        );
        assert_eq!(
            markdown,
            "Intro\n\nSTART TABLE IN MARKDOWN\n| K | V |\n| - | - |\n| a | 1 |\n| b | 2 |\nEND TABLE IN MARKDOWN\n\nOutro"
        );
    }

    #[test]
    fn non_object_value_is_rejected() {
        let err = convert_html_to_md_value(serde_json::json!(42), &NormalizerConfig::default())
            .unwrap_err();
        assert!(matches!(err, crate::ChunkerError::NotAMapping { found: "number" }));
    }

    #[test]
    fn placeholder_lookalike_text_stays_text() {
        let markdown = convert_html_to_md_text(
            "<p>see DOCCHUNKTABLE0X0END</p><table><tr><th>K</th><th>V</th></tr><tr><td>a</td><td>1</td></tr><tr><td>b</td><td>2</td></tr></table>",
            &NormalizerConfig::default(),
        );
        assert!(markdown.starts_with("see DOCCHUNKTABLE0X0END\n"), "{markdown}");
        assert_eq!(markdown.matches("START TABLE IN MARKDOWN").count(), 1, "{markdown}");
        assert_eq!(markdown.matches("| a | 1 |").count(), 1, "{markdown}");
    }
}
