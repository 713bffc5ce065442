//! Table detection and markdown rendering
//!
//! Tables that hold real data are rendered to pipe tables. Layout tables
//! (one row, one column, or huge cells) are flattened into their content.
//!
//! Rendered tables cannot go through the generic HTML → markdown renderer,
//! which collapses the newlines a pipe table depends on. Each one is parked
//! in [`TableBlocks`] and replaced by a placeholder paragraph that is swapped
//! back after rendering, the same way protected code blocks are handled.

use regex::{Captures, Regex};

use super::dom::{Element, Node};
use super::html_cleaning::clean_spaces;
use crate::config::NormalizerConfig;
use crate::utils::{TABLE_END_MARKER, TABLE_START_MARKER};

/// Rendered markdown tables waiting to be spliced back into the output
///
/// Placeholders are `<prefix><id>END`, where the prefix is chosen so that it
/// does not occur anywhere in the document's own text.
#[derive(Debug, Clone)]
pub struct TableBlocks {
    prefix: String,
    pattern: Regex,
    tables: Vec<String>,
}

impl TableBlocks {
    /// Table storage whose placeholders cannot collide with `text`
    pub fn for_text(text: &str) -> Self {
        let prefix = (0u64..)
            .map(|salt| format!("DOCCHUNKTABLE{salt}X"))
            .find(|prefix| !text.contains(prefix.as_str()))
            .unwrap_or_default();
        let pattern = Regex::new(&format!(r"{}(\d+)END", regex::escape(&prefix)))
            .expect("BUG: placeholder regex built from an alphanumeric prefix is statically valid");
        Self {
            prefix,
            pattern,
            tables: Vec::new(),
        }
    }

    /// Store a rendered table and return its placeholder text
    fn park(&mut self, table: String) -> String {
        let id = self.tables.len();
        self.tables.push(table);
        format!("{}{id}END", self.prefix)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Replace every placeholder in `markdown` by its marker-delimited table.
    ///
    /// Each table is restored at most once. Tables whose placeholder did not
    /// survive rendering are reported with a warning.
    pub fn restore(&self, markdown: &str) -> String {
        let mut restored = vec![false; self.tables.len()];
        let output = self
            .pattern
            .replace_all(markdown, |caps: &Captures| {
                let id = caps[1].parse::<usize>().ok().filter(|&id| id < self.tables.len());
                match id {
                    Some(id) if !restored[id] => {
                        restored[id] = true;
                        let table = &self.tables[id];
                        format!("\n\n{TABLE_START_MARKER}\n\n{table}\n{TABLE_END_MARKER}\n")
                    }
                    _ => caps[0].to_string(),
                }
            })
            .into_owned();

        let missing = restored.iter().filter(|done| !**done).count();
        if missing > 0 {
            tracing::warn!(missing, "Table placeholders lost during rendering");
        }
        output
    }
}

/// Whether a table is layout-only and should be flattened instead of rendered.
///
/// True when the table body has at most one row, when no row has more than
/// one `td`, or when any cell reaches `max_cell_chars` characters.
pub fn should_destruct_table(table: &Element, config: &NormalizerConfig) -> bool {
    let body = table.children_named("tbody").next().unwrap_or(table);

    let rows: Vec<&Element> = body.children_named("tr").collect();
    if rows.len() <= 1 {
        return true;
    }

    let widest = body
        .descendants()
        .into_iter()
        .filter(|el| el.name == "tr")
        .map(|tr| tr.children_named("td").count())
        .max()
        .unwrap_or(0);
    if widest <= 1 {
        return true;
    }

    rows.iter()
        .flat_map(|tr| tr.children_named("td"))
        .any(|td| td.text().chars().count() >= config.max_cell_chars())
}

/// Flatten a table into its cell contents, one space between cells.
pub fn destruct_table(table: Element) -> Vec<Node> {
    let mut out = Vec::new();
    unwrap_table_parts(table.children, &mut out);
    while matches!(out.last(), Some(Node::Text(t)) if t == " ") {
        out.pop();
    }
    out
}

fn unwrap_table_parts(nodes: Vec<Node>, out: &mut Vec<Node>) {
    for node in nodes {
        match node {
            Node::Element(el)
                if matches!(
                    el.name.as_str(),
                    "thead" | "tbody" | "tfoot" | "tr" | "td" | "th"
                ) =>
            {
                let is_cell = el.is_cell();
                unwrap_table_parts(el.children, out);
                if is_cell && !matches!(out.last(), Some(Node::Text(t)) if t == " ") {
                    out.push(Node::text(" "));
                }
            }
            other => out.push(other),
        }
    }
}

/// Text of a table cell: pieces joined by spaces, whitespace collapsed,
/// `|` and `-` escaped.
fn cell_text(cell: &Element) -> String {
    let joined = cell.text_pieces().join(" ");
    let cleaned: String = clean_spaces(&joined)
        .chars()
        .filter(|c| !matches!(c, '\r' | '\u{000C}' | '\u{0008}'))
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut escaped = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        if matches!(ch, '|' | '-') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn transpose<T: Clone>(rows: &[Vec<T>]) -> Vec<Vec<T>> {
    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    (0..width)
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect()
}

/// Render a table element as a markdown pipe table.
///
/// Tables whose first column is all headers (and first row is not) are
/// transposed so the headers end up on top. Single-record tables are turned
/// into a two-column key/value listing. Returns an empty string for tables
/// without any cells.
pub fn render_table_markdown(table: &Element, pad_columns: bool) -> String {
    let mut values: Vec<Vec<String>> = Vec::new();
    let mut headers: Vec<Vec<bool>> = Vec::new();

    for row in table.descendants().into_iter().filter(|el| el.name == "tr") {
        let cells: Vec<&Element> = row.descendants().into_iter().filter(|el| el.is_cell()).collect();
        if cells.is_empty() {
            continue;
        }
        values.push(cells.iter().map(|cell| cell_text(cell)).collect());
        headers.push(cells.iter().map(|cell| cell.name == "th").collect());
    }

    if values.is_empty() {
        return String::new();
    }

    // Row headers in the first column: put them on top instead
    if headers.iter().all(|row| row[0]) && !headers[0].iter().all(|&h| h) {
        values = transpose(&values);
        headers = transpose(&headers);
    }

    // A single record reads better as one column per field
    let single_record =
        values.len() == 1 || (values.len() == 2 && !headers[1].iter().all(|&h| h));
    if single_record && values[0].len() > 1 {
        values = transpose(&values);
        headers = values.iter().map(|row| vec![false; row.len()]).collect();
    }

    format_rows(&values, &headers, pad_columns)
}

fn format_rows(values: &[Vec<String>], headers: &[Vec<bool>], pad_columns: bool) -> String {
    let widest = values.iter().map(Vec::len).max().unwrap_or(0);
    let padding: Vec<usize> = (0..widest)
        .map(|col| {
            values
                .iter()
                .filter_map(|row| row.get(col))
                .map(|value| value.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pipe_row = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
    let separator = |len: usize| {
        pipe_row(
            (0..len)
                .map(|col| if pad_columns { "-".repeat(padding[col].max(1)) } else { "-".to_string() })
                .collect(),
        )
    };

    let mut lines = Vec::new();
    for (index, (row, row_headers)) in values.iter().zip(headers).enumerate() {
        let any_header = row_headers.iter().any(|&h| h);
        let all_headers = row_headers.iter().all(|&h| h);

        if index == 0 && !any_header {
            lines.push(pipe_row(
                (0..row.len())
                    .map(|col| if pad_columns { " ".repeat(padding[col]) } else { String::new() })
                    .collect(),
            ));
            lines.push(separator(row.len()));
        }

        // Subheader rows start a new block inside the table
        if index != 0 && all_headers {
            lines.push(String::new());
        }

        lines.push(pipe_row(
            row.iter()
                .enumerate()
                .map(|(col, value)| {
                    if pad_columns {
                        let fill = padding[col].saturating_sub(value.chars().count());
                        format!("{value}{}", " ".repeat(fill))
                    } else {
                        value.clone()
                    }
                })
                .collect(),
        ));

        if (index == 0 && any_header) || all_headers {
            lines.push(separator(row.len()));
        }
    }
    lines.join("\n")
}

/// Replace data tables by placeholders and flatten layout tables.
///
/// Returns the rewritten nodes together with the rendered tables, to be
/// restored with [`TableBlocks::restore`] once the rest is markdown.
pub fn convert_tables_to_markdown(
    nodes: Vec<Node>,
    config: &NormalizerConfig,
) -> (Vec<Node>, TableBlocks) {
    let text: String = nodes.iter().map(node_text).collect();
    let mut blocks = TableBlocks::for_text(&text);
    let nodes = convert_nodes(nodes, config, &mut blocks);
    (nodes, blocks)
}

fn node_text(node: &Node) -> String {
    match node {
        Node::Text(text) => text.clone(),
        Node::Element(el) => el.text(),
        Node::Comment(_) => String::new(),
    }
}

fn convert_nodes(nodes: Vec<Node>, config: &NormalizerConfig, blocks: &mut TableBlocks) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) if el.name == "table" => {
                if should_destruct_table(&el, config) {
                    // Nested tables inside a layout table are still candidates
                    out.extend(convert_nodes(destruct_table(el), config, blocks));
                    continue;
                }
                let rendered = render_table_markdown(&el, config.pad_columns());
                if rendered.trim().is_empty() {
                    tracing::debug!("Dropping table without any cell text");
                    continue;
                }
                let placeholder = blocks.park(rendered);
                out.push(Node::Element(Element::paragraph(placeholder)));
            }
            Node::Element(mut el) => {
                el.children = convert_nodes(std::mem::take(&mut el.children), config, blocks);
                out.push(Node::Element(el));
            }
            other => out.push(other),
        }
    }
    out
}
