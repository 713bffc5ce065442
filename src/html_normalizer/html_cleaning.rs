//! Whitespace normalization, fragment parsing and DOM cleaning
//!
//! Removes elements that carry no content (scripts, images, buttons, page
//! chrome) and reduces every surviving node to the parts the markdown
//! renderer understands.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::dom::{self, Element, Node, Visit};
use crate::config::NormalizerConfig;
use crate::utils::{SECTION_END_MARKER, SECTION_START_MARKER};

/// Horizontal whitespace variants, including NBSP and the line separator
static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{0020}\x{0009}\x{00A0}\x{1680}\x{2000}-\x{200A}\x{202F}\x{205F}\x{3000}\x{2028}]+")
        .expect("BUG: hardcoded HORIZONTAL_WHITESPACE regex is statically valid")
});

static VERTICAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{000A}\x{000D}\x{0085}]+")
        .expect("BUG: hardcoded VERTICAL_WHITESPACE regex is statically valid")
});

static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\s*\n\s*)+").expect("BUG: hardcoded NEWLINE_RUNS regex is statically valid")
});

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("BUG: hardcoded BLANK_RUNS regex is statically valid")
});

/// Wrappers of collapsible documentation sections
static SECTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.section.blockContent")
        .expect("BUG: hardcoded CSS selector 'div.section.blockContent' is statically valid")
});

/// Navigation widgets that otherwise end up as tiny content-free chunks
static NAVIGATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.component_header_button, a.tab_href")
        .expect("BUG: hardcoded navigation CSS selector is statically valid")
});

/// Map every whitespace variant onto a space, a newline or a paragraph break.
///
/// Runs of horizontal whitespace become one space, runs of line breaks one
/// `\n`, and each U+2029 paragraph separator becomes `\n\n`.
pub fn simplify_whitespace(text: &str) -> String {
    let text = HORIZONTAL_WHITESPACE.replace_all(text, " ");
    let text = VERTICAL_WHITESPACE.replace_all(&text, "\n");
    text.replace('\u{2029}', "\n\n")
}

/// Collapse whitespace around newlines to a single `\n` and blank runs to one space.
pub fn clean_spaces(text: &str) -> String {
    let text = NEWLINE_RUNS.replace_all(text, "\n");
    BLANK_RUNS.replace_all(&text, " ").into_owned()
}

/// Parse an HTML fragment, bracketing documentation sections with marker
/// paragraphs and dropping navigation widgets.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    dom::from_scraper(&fragment, |element: ElementRef<'_>| {
        if NAVIGATION_SELECTOR.matches(&element) {
            Visit::Prune
        } else if SECTION_SELECTOR.matches(&element) {
            Visit::Bracket(SECTION_START_MARKER, SECTION_END_MARKER)
        } else {
            Visit::Keep
        }
    })
}

/// Strip everything the markdown renderer should not see.
///
/// - comments are dropped
/// - blacklisted elements are dropped with their subtree
/// - headings are reduced to their plain text
/// - attributes outside the allow-list are removed
/// - whitespace-only text disappears, other text goes through [`clean_spaces`]
pub fn clean_html(nodes: Vec<Node>, config: &NormalizerConfig) -> Vec<Node> {
    nodes
        .into_iter()
        .filter_map(|node| clean_node(node, config))
        .collect()
}

fn clean_node(node: Node, config: &NormalizerConfig) -> Option<Node> {
    match node {
        Node::Comment(_) => None,
        Node::Text(text) => clean_text(&text).map(Node::Text),
        Node::Element(el) => {
            if config.is_blacklisted(&el.name) {
                return None;
            }
            Some(Node::Element(clean_element(el, config)))
        }
    }
}

fn clean_text(text: &str) -> Option<String> {
    let cleaned = clean_spaces(text);
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn clean_element(mut el: Element, config: &NormalizerConfig) -> Element {
    el.attrs.retain(|(name, _)| config.is_allowed_attribute(name));
    el.children = clean_html(std::mem::take(&mut el.children), config);

    if el.is_heading() {
        // Nested markup or line breaks inside a heading break ATX rendering
        let plain = el
            .text_pieces()
            .iter()
            .map(|piece| piece.trim())
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        el.children = clean_text(&plain).map(Node::Text).into_iter().collect();
    }
    el
}
