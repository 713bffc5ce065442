//! Materialization of `colspan` and `rowspan` cells
//!
//! Both passes consume a tree and build a new one. After they run, every
//! spanned cell has been replaced by one plain copy per covered grid slot,
//! so a well-formed table becomes a rectangular grid without span attributes.

use std::collections::HashMap;

use super::dom::{Element, Node};
use crate::utils::MAX_CELL_SPAN;

/// Parse a span attribute. Anything that is not a positive integer counts as 1.
fn parse_span(value: &str) -> usize {
    value
        .trim()
        .parse::<usize>()
        .map_or(1, |span| span.clamp(1, MAX_CELL_SPAN))
}

/// Replace each `colspan=N` cell by N copies of itself, side by side.
pub fn expand_table_colspan(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let mut el = match node {
            Node::Element(el) => el,
            other => {
                out.push(other);
                continue;
            }
        };
        el.children = expand_table_colspan(std::mem::take(&mut el.children));

        let copies = if el.is_cell() {
            el.take_attr("colspan").map_or(1, |span| parse_span(&span))
        } else {
            1
        };
        for _ in 1..copies {
            out.push(Node::Element(el.clone()));
        }
        out.push(Node::Element(el));
    }
    out
}

/// Position of the walk inside the innermost table
#[derive(Debug, Default)]
struct TableCursor {
    row: usize,
    col: usize,
    /// Cells owed to later rows, keyed by the `(row, col)` slot they fill
    pending: HashMap<(usize, usize), Element>,
}

impl TableCursor {
    /// Emit the copies owed to the slots starting at the current column.
    fn fill_pending(&mut self, out: &mut Vec<Node>) {
        while let Some(cell) = self.pending.get(&(self.row, self.col)) {
            out.push(Node::Element(cell.clone()));
            self.col += 1;
        }
    }
}

/// Replace each `rowspan=N` cell by a copy in the same column of the next N-1 rows.
pub fn expand_table_rowspan(nodes: Vec<Node>) -> Vec<Node> {
    let mut cursor = None;
    expand_rows(nodes, &mut cursor)
}

fn expand_rows(nodes: Vec<Node>, cursor: &mut Option<TableCursor>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) => expand_element(el, cursor, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn expand_element(mut el: Element, cursor: &mut Option<TableCursor>, out: &mut Vec<Node>) {
    match el.name.as_str() {
        "table" => {
            // Nested tables keep their own grid
            let mut inner = Some(TableCursor::default());
            el.children = expand_rows(std::mem::take(&mut el.children), &mut inner);
            out.push(Node::Element(el));
        }
        "tr" => {
            let mut row = Vec::with_capacity(el.children.len());
            if let Some(c) = cursor.as_mut() {
                c.col = 0;
                c.fill_pending(&mut row);
            }
            row.extend(expand_rows(std::mem::take(&mut el.children), cursor));
            el.children = row;
            if let Some(c) = cursor.as_mut() {
                c.row += 1;
                c.col = 0;
            }
            out.push(Node::Element(el));
        }
        "td" | "th" => {
            let span = el.take_attr("rowspan").map(|span| parse_span(&span));
            let origin = cursor.as_ref().map(|c| (c.row, c.col));
            el.children = expand_rows(std::mem::take(&mut el.children), cursor);

            if let (Some(c), Some((row, col)), Some(span)) = (cursor.as_mut(), origin, span) {
                for offset in 1..span {
                    c.pending.insert((row + offset, col), el.clone());
                }
            }
            out.push(Node::Element(el));
            if let Some(c) = cursor.as_mut() {
                c.col += 1;
                c.fill_pending(out);
            }
        }
        _ => {
            el.children = expand_rows(std::mem::take(&mut el.children), cursor);
            out.push(Node::Element(el));
        }
    }
}
