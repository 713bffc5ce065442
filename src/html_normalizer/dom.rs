//! Owned HTML tree used between normalization passes
//!
//! html5ever (through `scraper`) does the permissive parsing. The result is
//! copied into plain owned nodes so that every pass can consume a tree and
//! build a new one, instead of splicing siblings into a shared arena.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html};

/// Void elements never get a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// What to do with a parsed element while copying it into the owned tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    /// Drop the element and its subtree
    Prune,
    /// Keep the element between two marker paragraphs
    Bracket(&'static str, &'static str),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<p>` holding a single text node
    pub fn paragraph(text: impl Into<String>) -> Self {
        let mut p = Self::new("p");
        p.children.push(Node::text(text));
        p
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Remove an attribute, returning its value if it was present
    pub fn take_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    pub fn is_cell(&self) -> bool {
        matches!(self.name.as_str(), "td" | "th")
    }

    /// Direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct element children named `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |el| el.name == name)
    }

    /// All descendant elements in document order, excluding `self`
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(&self.children, &mut out);
        out
    }

    /// Every descendant text node, in document order
    pub fn text_pieces(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Concatenated descendant text
    pub fn text(&self) -> String {
        self.text_pieces().concat()
    }
}

fn collect_descendants<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
    for node in nodes {
        if let Node::Element(el) = node {
            out.push(el);
            collect_descendants(&el.children, out);
        }
    }
}

fn collect_text<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push(text),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Comment(_) => {}
        }
    }
}

/// Parse an HTML fragment into owned nodes, keeping everything.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    from_scraper(&fragment, |_| Visit::Keep)
}

/// Copy a parsed `scraper` document into owned nodes.
///
/// `classify` is asked about every element and decides whether it is kept,
/// pruned with its subtree, or bracketed between two marker paragraphs.
pub fn from_scraper<F>(fragment: &Html, classify: F) -> Vec<Node>
where
    F: Fn(ElementRef<'_>) -> Visit,
{
    let mut out = Vec::new();
    for child in fragment.root_element().children() {
        copy_node(child, &classify, &mut out);
    }
    out
}

fn copy_node<F>(node: NodeRef<'_, scraper::Node>, classify: &F, out: &mut Vec<Node>)
where
    F: Fn(ElementRef<'_>) -> Visit,
{
    match node.value() {
        scraper::Node::Text(text) => out.push(Node::Text(String::from(&**text))),
        scraper::Node::Comment(comment) => out.push(Node::Comment(String::from(&**comment))),
        scraper::Node::Element(_) => {
            let Some(element_ref) = ElementRef::wrap(node) else {
                return;
            };
            let visit = classify(element_ref);
            if visit == Visit::Prune {
                return;
            }

            let value = element_ref.value();
            let mut element = Element::new(value.name());
            element.attrs = value
                .attrs()
                .map(|(key, val)| (key.to_string(), val.to_string()))
                .collect();
            for child in node.children() {
                copy_node(child, classify, &mut element.children);
            }

            match visit {
                Visit::Bracket(before, after) => {
                    out.push(Node::Element(Element::paragraph(before)));
                    out.push(Node::Element(element));
                    out.push(Node::Element(Element::paragraph(after)));
                }
                _ => out.push(Node::Element(element)),
            }
        }
        // Doctype, processing instructions and the document node carry no content
        _ => {}
    }
}

/// Serialize nodes back to HTML
pub fn to_html(nodes: &[Node]) -> String {
    let mut output = String::new();
    write_nodes(nodes, &mut output);
    output
}

fn write_nodes(nodes: &[Node], output: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(&html_escape::encode_text(text)),
            Node::Comment(comment) => {
                output.push_str("<!--");
                output.push_str(comment);
                output.push_str("-->");
            }
            Node::Element(el) => {
                output.push('<');
                output.push_str(&el.name);
                for (name, value) in &el.attrs {
                    output.push(' ');
                    output.push_str(name);
                    output.push_str("=\"");
                    output.push_str(&html_escape::encode_double_quoted_attribute(value));
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&el.name.as_str()) {
                    continue;
                }

                write_nodes(&el.children, output);
                output.push_str("</");
                output.push_str(&el.name);
                output.push('>');
            }
        }
    }
}

/// Plain text of a node list with block-ish elements separated by newlines
///
/// Used as the last-resort rendering when markdown conversion fails.
pub fn text_content(nodes: &[Node]) -> String {
    let mut output = String::new();
    write_text(nodes, &mut output);
    output
}

fn write_text(nodes: &[Node], output: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Comment(_) => {}
            Node::Element(el) => {
                let block = matches!(
                    el.name.as_str(),
                    "p" | "div" | "li" | "tr" | "br" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                );
                if block && !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                write_text(&el.children, output);
                if block {
                    output.push('\n');
                }
            }
        }
    }
}
