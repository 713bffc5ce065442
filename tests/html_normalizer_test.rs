//! Integration tests for HTML → markdown normalization
//!
//! Covers layout-table flattening, span materialization, section markers,
//! navigation pruning and whitespace handling through the public API.

use kodegen_tools_docchunk::html_normalizer::dom::{Element, Node, parse_fragment};
use kodegen_tools_docchunk::html_normalizer::{
    convert_html_to_md_text, expand_table_colspan, expand_table_rowspan,
};
use kodegen_tools_docchunk::{NormalizerConfig, SourceDocument, convert_html_to_md};

fn convert(html: &str) -> String {
    convert_html_to_md_text(html, &NormalizerConfig::default())
}

fn rows(nodes: &[Node]) -> Vec<Vec<Element>> {
    let mut out = Vec::new();
    for node in nodes {
        if let Node::Element(el) = node {
            if el.name == "tr" {
                out.push(el.child_elements().filter(|c| c.is_cell()).cloned().collect());
            } else {
                out.extend(rows(&el.children));
            }
        }
    }
    out
}

#[test]
fn test_single_row_table_is_flattened() {
    let markdown = convert("<table><tr><td>A</td><td>B</td></tr></table>");
    assert_eq!(markdown, "A B");
    assert!(!markdown.contains("START TABLE IN MARKDOWN"));
    assert!(!markdown.contains("END TABLE IN MARKDOWN"));
}

#[test]
fn test_rowspan_copy_fills_second_row() {
    let nodes = expand_table_rowspan(expand_table_colspan(parse_fragment(
        r#"<table><tr><td rowspan="2">X</td><td>A</td></tr><tr><td>B</td></tr></table>"#,
    )));
    let grid = rows(&nodes);
    assert_eq!(grid.len(), 2);
    assert_eq!(grid[1].len(), 2);

    let copy = &grid[1][0];
    assert_eq!(copy.text(), "X");
    assert_eq!(copy.attr("rowspan"), None);
    assert_eq!(grid[1][1].text(), "B");
    assert_eq!(grid[0][0].attr("rowspan"), None);
}

#[test]
fn test_invalid_span_counts_as_one() {
    let nodes = expand_table_rowspan(expand_table_colspan(parse_fragment(
        r#"<table><tr><td colspan="abc" rowspan="-2">X</td><td>A</td></tr><tr><td>B</td><td>C</td></tr></table>"#,
    )));
    let grid = rows(&nodes);
    assert_eq!(grid.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2]);
}

#[test]
fn test_spanned_table_renders_as_rectangular_markdown() {
    let markdown = convert(
        r#"<table><tr><th>Name</th><th>Value</th></tr><tr><td rowspan="2">shared</td><td>1</td></tr><tr><td>2</td></tr></table>"#,
    );
    let table: Vec<&str> = markdown
        .lines()
        .skip_while(|l| *l != "START TABLE IN MARKDOWN")
        .skip(1)
        .take_while(|l| *l != "END TABLE IN MARKDOWN")
        .collect();
    assert!(!table.is_empty(), "{markdown}");
    for line in &table {
        assert_eq!(line.matches('|').count(), 3, "{line}");
    }
    assert!(markdown.matches("shared").count() >= 2, "{markdown}");
}

#[test]
fn test_documentation_sections_are_bracketed() {
    let markdown = convert(
        r#"<p>Before</p><div class="section blockContent"><p>Inside</p></div><p>After</p>"#,
    );
    let start = markdown.find("START SECTION").expect("start marker");
    let inside = markdown.find("Inside").expect("section body");
    let end = markdown.find("END SECTION").expect("end marker");
    assert!(start < inside && inside < end, "{markdown}");
    assert!(markdown.contains("\n\nSTART SECTION\n\n"), "{markdown}");
}

#[test]
fn test_navigation_widgets_are_removed() {
    let markdown = convert(
        r##"<p>Body <span class="component_header_button">Copy</span></p><a class="tab_href" href="#x">Tab</a>"##,
    );
    assert!(markdown.contains("Body"));
    assert!(!markdown.contains("Copy"));
    assert!(!markdown.contains("Tab"));
}

#[test]
fn test_blacklisted_elements_disappear() {
    let markdown = convert(
        r#"<head><title>T</title></head><script>var x = 1;</script><style>p{}</style><p>Kept</p><button>Click</button><img src="a.png">"#,
    );
    assert_eq!(markdown, "Kept");
}

#[test]
fn test_headings_are_atx_and_flattened() {
    let markdown = convert("<h2>Install <em>now</em></h2><p>Run it.</p>");
    assert_eq!(markdown, "## Install now\n\nRun it.");
}

#[test]
fn test_no_trailing_whitespace_survives() {
    let markdown = convert("<p>one   \u{a0}</p>\n\n\n<p>two\t</p>");
    for line in markdown.lines() {
        assert_eq!(line, line.trim_end(), "{markdown:?}");
    }
    assert!(markdown.contains("one"));
    assert!(markdown.contains("two"));
}

#[test]
fn test_document_metadata_is_carried_over() {
    let mut document = SourceDocument::new("page", "Guide", "<p>Hello</p>");
    document
        .metadata
        .insert("url".to_string(), serde_json::json!("https://example.com/page"));

    let markdown = convert_html_to_md(document, &NormalizerConfig::default());
    assert_eq!(markdown.name, "page");
    assert_eq!(markdown.source, "Guide");
    assert_eq!(markdown.text, "Hello");
    assert_eq!(markdown.token_length, 1);
    assert_eq!(markdown.metadata["url"], "https://example.com/page");
}
