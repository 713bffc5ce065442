//! Property tests for the normalization and splitting invariants

use kodegen_tools_docchunk::html_normalizer::dom::{Node, parse_fragment};
use kodegen_tools_docchunk::html_normalizer::{
    clean_spaces, convert_html_to_md_text, expand_table_colspan, expand_table_rowspan,
    simplify_whitespace,
};
use kodegen_tools_docchunk::{ChunkingConfig, NormalizerConfig, split_markdown};
use proptest::prelude::*;

/// A table tiled with non-overlapping spanning cells
#[derive(Debug, Clone)]
struct TiledTable {
    width: usize,
    height: usize,
    /// `(row, col, colspan, rowspan)` in row-major order of their origin
    cells: Vec<(usize, usize, usize, usize)>,
}

impl TiledTable {
    /// Greedily tile a grid, taking span sizes from `seeds`
    fn tile(width: usize, height: usize, seeds: &[(usize, usize)]) -> Self {
        let mut taken = vec![vec![false; width]; height];
        let mut cells = Vec::new();
        let mut seeds = seeds.iter().cycle();

        for row in 0..height {
            for col in 0..width {
                if taken[row][col] {
                    continue;
                }
                let free_width = (col..width).take_while(|&c| !taken[row][c]).count();
                let (seed_w, seed_h) = seeds.next().copied().unwrap_or((0, 0));
                let colspan = 1 + seed_w % free_width;

                let free_height = (row..height)
                    .take_while(|&r| (col..col + colspan).all(|c| !taken[r][c]))
                    .count();
                let rowspan = 1 + seed_h % free_height;

                for r in row..row + rowspan {
                    for c in col..col + colspan {
                        taken[r][c] = true;
                    }
                }
                cells.push((row, col, colspan, rowspan));
            }
        }
        Self { width, height, cells }
    }

    fn label(row: usize, col: usize) -> String {
        format!("r{row}c{col}")
    }

    fn to_html(&self) -> String {
        let mut html = String::from("<table>");
        for row in 0..self.height {
            html.push_str("<tr>");
            for &(r, c, colspan, rowspan) in self.cells.iter().filter(|cell| cell.0 == row) {
                html.push_str(&format!(
                    r#"<td colspan="{colspan}" rowspan="{rowspan}">{}</td>"#,
                    Self::label(r, c)
                ));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }

    /// Label of the cell covering every grid slot
    fn expected_grid(&self) -> Vec<Vec<String>> {
        let mut grid = vec![vec![String::new(); self.width]; self.height];
        for &(row, col, colspan, rowspan) in &self.cells {
            for line in grid.iter_mut().skip(row).take(rowspan) {
                for slot in line.iter_mut().skip(col).take(colspan) {
                    *slot = Self::label(row, col);
                }
            }
        }
        grid
    }
}

fn tiled_table() -> impl Strategy<Value = TiledTable> {
    (1usize..6, 1usize..6, prop::collection::vec((0usize..4, 0usize..4), 1..40))
        .prop_map(|(width, height, seeds)| TiledTable::tile(width, height, &seeds))
}

fn cell_rows(nodes: &[Node]) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for node in nodes {
        if let Node::Element(el) = node {
            if el.name == "tr" {
                out.push(el.child_elements().filter(|c| c.is_cell()).map(|c| c.text()).collect());
            } else {
                out.extend(cell_rows(&el.children));
            }
        }
    }
    out
}

fn data_table() -> impl Strategy<Value = String> {
    (2usize..5, 2usize..5, "[a-z]{1,8}").prop_map(|(rows, cols, word)| {
        let mut html = String::from("<table>");
        for r in 0..rows {
            html.push_str("<tr>");
            for c in 0..cols {
                html.push_str(&format!("<td>{word}{r}{c}</td>"));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    })
}

fn html_page() -> impl Strategy<Value = String> {
    let block = prop_oneof![
        "[a-z ]{1,30}".prop_map(|text| format!("<p>{text}</p>")),
        "[a-z ]{1,20}".prop_map(|text| format!("<h2>{text}</h2>")),
        data_table(),
    ];
    let flat = prop::collection::vec(block, 0..4).prop_map(|blocks| blocks.concat());

    // Documentation sections, possibly nested
    flat.prop_recursive(3, 24, 4, |inner| {
        let section = inner
            .clone()
            .prop_map(|html| format!(r#"<div class="section blockContent">{html}</div>"#));
        prop::collection::vec(prop_oneof![inner, section], 1..4).prop_map(|parts| parts.concat())
    })
}

proptest! {
    /// Span materialization always yields the grid the spans describe
    #[test]
    fn prop_spans_expand_to_rectangular_grid(table in tiled_table()) {
        let nodes = expand_table_rowspan(expand_table_colspan(parse_fragment(&table.to_html())));
        let rows = cell_rows(&nodes);

        prop_assert_eq!(rows.len(), table.height);
        for row in &rows {
            prop_assert_eq!(row.len(), table.width);
        }
        prop_assert_eq!(rows, table.expected_grid());
    }

    /// Every table start marker has a matching end marker after it
    #[test]
    fn prop_table_markers_are_balanced(html in html_page()) {
        let markdown = convert_html_to_md_text(&html, &NormalizerConfig::default());
        let mut open = false;
        for line in markdown.lines() {
            if line == "START TABLE IN MARKDOWN" {
                prop_assert!(!open, "nested start marker in {:?}", markdown);
                open = true;
            } else if line == "END TABLE IN MARKDOWN" {
                prop_assert!(open, "end marker without start in {:?}", markdown);
                open = false;
            }
        }
        prop_assert!(!open, "unterminated table in {:?}", markdown);
    }

    /// Section markers nest properly and every section is closed
    #[test]
    fn prop_section_markers_are_balanced(html in html_page()) {
        let markdown = convert_html_to_md_text(&html, &NormalizerConfig::default());
        let sections = html.matches("section blockContent").count();
        let mut depth = 0usize;
        let mut opened = 0usize;
        for line in markdown.lines() {
            if line == "START SECTION" {
                depth += 1;
                opened += 1;
            } else if line == "END SECTION" {
                prop_assert!(depth > 0, "end marker without start in {:?}", markdown);
                depth -= 1;
            }
        }
        prop_assert_eq!(depth, 0, "unterminated section in {:?}", markdown);
        prop_assert_eq!(opened, sections);
    }

    /// Whitespace simplification is a fixpoint without paragraph separators
    #[test]
    fn prop_simplify_whitespace_is_idempotent(text in "[a-z \t\r\n\u{a0}\u{2028}\u{3000}]{0,60}") {
        let once = simplify_whitespace(&text);
        prop_assert_eq!(simplify_whitespace(&once), once.clone());
        prop_assert!(!once.contains('\t'), "tab survived in {:?}", once);
        prop_assert!(!once.contains('\r'), "carriage return survived in {:?}", once);
        prop_assert!(!once.contains('\u{a0}'), "NBSP survived in {:?}", once);
    }

    #[test]
    fn prop_clean_spaces_leaves_single_separators(text in "[a-z \t\n]{0,60}") {
        let cleaned = clean_spaces(&text);
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains(" \n"));
        prop_assert!(!cleaned.contains("\n "));
        prop_assert!(!cleaned.contains("\n\n"));
    }

    /// Splitting never loses paragraphs and only exceeds the ceiling on
    /// unsplittable paragraphs
    #[test]
    fn prop_split_keeps_all_paragraphs(
        paragraphs in prop::collection::vec("[a-z]{1,400}", 1..20),
    ) {
        let config = ChunkingConfig::new()
            .with_target_chunk_size(40)
            .with_max_chunk_size(80);
        let markdown = paragraphs.join("\n\n");
        let chunks = split_markdown(&markdown, &config).expect("valid config");

        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n");
        for paragraph in &paragraphs {
            prop_assert!(joined.contains(paragraph.as_str()));
        }
        for chunk in &chunks {
            if chunk.token_length > config.max_chunk_size() {
                prop_assert_eq!(chunk.text.trim().lines().count(), 1);
            }
        }
    }
}
