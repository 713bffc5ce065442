//! HTML → markdown rendering and marker normalization
//!
//! Rendering goes through htmd with ATX headings. Links lose their target
//! during cleaning anyway, so anchors render as their text only.

use std::sync::LazyLock;

use anyhow::Result;
use htmd::{
    element_handler::{HandlerResult, Handlers},
    options::{HeadingStyle, Options},
    Element, HtmlToMarkdown,
};
use regex::Regex;

use crate::utils::{SECTION_END_MARKER, SECTION_START_MARKER, TABLE_END_MARKER, TABLE_START_MARKER};

/// A marker line with at least one newline before it and a blank line after it
fn marker_regex(marker: &str) -> Regex {
    Regex::new(&format!(r"\n+{}\n\n+", regex::escape(marker)))
        .expect("BUG: marker regex built from constant markers is statically valid")
}

static TABLE_START: LazyLock<Regex> = LazyLock::new(|| marker_regex(TABLE_START_MARKER));
static TABLE_END: LazyLock<Regex> = LazyLock::new(|| marker_regex(TABLE_END_MARKER));
static SECTION_START: LazyLock<Regex> = LazyLock::new(|| marker_regex(SECTION_START_MARKER));
static SECTION_END: LazyLock<Regex> = LazyLock::new(|| marker_regex(SECTION_END_MARKER));

/// Create the htmd converter used for the final rendering step
fn create_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .add_handler(vec!["a"], link_handler)
        .build()
}

/// Handle `<a>` elements: the text survives, the link does not
fn link_handler(handlers: &dyn Handlers, element: Element) -> Option<HandlerResult> {
    let text = handlers.walk_children(element.node).content;
    Some(HandlerResult::from(text))
}

/// Surround `<span>` elements with newlines so adjacent inline runs stay apart.
pub fn pad_spans(html: &str) -> String {
    html.replace("<span", "\n<span").replace("</span>", "</span>\n")
}

/// Render cleaned HTML to markdown.
///
/// # Errors
///
/// Returns an error if htmd fails to process the document.
pub fn render_markdown(html: &str) -> Result<String> {
    let converter = create_converter();
    let markdown = converter.convert(html)?;
    // Leftovers of images whose attributes were stripped
    Ok(markdown.replace("![]()", ""))
}

/// Give every marker line a fixed amount of surrounding blank lines.
///
/// A table's start marker is followed directly by the table and its end
/// marker is preceded directly by the last row, so the marker lines and the
/// table form one paragraph. Section markers always stand alone.
pub fn normalize_markers(markdown: &str) -> String {
    let markdown = TABLE_START.replace_all(markdown, format!("\n\n{TABLE_START_MARKER}\n").as_str());
    let markdown = TABLE_END.replace_all(&markdown, format!("\n{TABLE_END_MARKER}\n\n").as_str());
    let markdown = SECTION_START.replace_all(&markdown, format!("\n\n{SECTION_START_MARKER}\n\n").as_str());
    SECTION_END
        .replace_all(&markdown, format!("\n\n{SECTION_END_MARKER}\n\n").as_str())
        .into_owned()
}

/// Strip trailing whitespace from every line.
pub fn remove_trailing_whitespace(markdown: &str) -> String {
    markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_atx_and_links_are_text() -> Result<()> {
        let markdown = render_markdown("<h2>Setup</h2><p>See <a>the guide</a> first.</p>")?;
        assert!(markdown.contains("## Setup"), "{markdown}");
        assert!(markdown.contains("See the guide first."), "{markdown}");
        assert!(!markdown.contains("]("), "{markdown}");
        Ok(())
    }

    #[test]
    fn spans_get_padded() {
        assert_eq!(pad_spans("a<span>b</span>c"), "a\n<span>b</span>\nc");
    }

    #[test]
    fn table_markers_hug_the_table() {
        let input = "intro\n\n\n\nSTART TABLE IN MARKDOWN\n\n| a |\nEND TABLE IN MARKDOWN\n\n\n\nafter";
        assert_eq!(
            normalize_markers(input),
            "intro\n\nSTART TABLE IN MARKDOWN\n| a |\nEND TABLE IN MARKDOWN\n\nafter"
        );
    }

    #[test]
    fn section_markers_stand_alone() {
        let input = "a\nSTART SECTION\n\n\n\nb\n\n\nEND SECTION\n\nc";
        assert_eq!(
            normalize_markers(input),
            "a\n\nSTART SECTION\n\nb\n\nEND SECTION\n\nc"
        );
    }

    #[test]
    fn trailing_whitespace_is_removed_per_line() {
        assert_eq!(remove_trailing_whitespace("a  \n b\t\n\nc "), "a\n b\n\nc");
    }
}
