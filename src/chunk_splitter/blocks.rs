//! Line-based markdown block parser
//!
//! The splitter only needs to know where headings, paragraphs, fenced code
//! and blank lines are. Each block keeps its source lines verbatim (every
//! line ending in `\n`), so rendering a block list is plain concatenation.

use crate::utils::atx_heading_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// ATX heading, `#` to `######`
    Heading { level: u8 },
    Paragraph,
    /// Fenced code block, fences included
    CodeBlock,
    /// One or more blank lines, rendered as a single empty line
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    fn new(kind: BlockKind, text: String) -> Self {
        Self { kind, text }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// A heading with nothing but hashes and whitespace
    pub fn is_empty_heading(&self) -> bool {
        self.heading_level().is_some() && self.text.replace('#', "").trim().is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Paragraph consisting of exactly one strong emphasis run, e.g. `**Options**`
    pub fn is_implicit_heading(&self) -> bool {
        if self.kind != BlockKind::Paragraph {
            return false;
        }
        let mut lines = self.text.lines();
        let (Some(line), None) = (lines.next(), lines.next()) else {
            return false;
        };
        let line = line.trim();
        ["**", "__"].iter().any(|&delim| {
            line.strip_prefix(delim)
                .and_then(|rest| rest.strip_suffix(delim))
                .is_some_and(|inner| {
                    !inner.is_empty()
                        && !inner.contains(delim)
                        && !inner.starts_with(char::is_whitespace)
                        && !inner.ends_with(char::is_whitespace)
                })
        })
    }

    /// Paragraph whose whole text is `marker`
    pub fn is_marker(&self, marker: &str) -> bool {
        self.kind == BlockKind::Paragraph && self.text.trim() == marker
    }
}

/// Opening fence of a fenced code block: the fence char and its run length
fn fence_open(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = trimmed.len() - trimmed.trim_start_matches(fence_char).len();
    if run < 3 {
        return None;
    }
    // Backtick fences cannot have backticks in the info string
    if fence_char == '`' && trimmed[run..].contains('`') {
        return None;
    }
    Some((fence_char, run))
}

fn closes_fence(line: &str, fence_char: char, run: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= run && trimmed.chars().all(|c| c == fence_char)
}

/// Split markdown into blocks.
///
/// Headings and fences interrupt paragraphs; consecutive blank lines form a
/// single [`BlockKind::Blank`] block. An unterminated fence runs to the end.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();
    let mut fence: Option<(char, usize, String)> = None;

    let flush = |paragraph: &mut String, blocks: &mut Vec<Block>| {
        if !paragraph.is_empty() {
            blocks.push(Block::new(BlockKind::Paragraph, std::mem::take(paragraph)));
        }
    };

    for line in markdown.lines() {
        if let Some((fence_char, run, mut code)) = fence.take() {
            code.push_str(line);
            code.push('\n');
            if closes_fence(line, fence_char, run) {
                blocks.push(Block::new(BlockKind::CodeBlock, code));
            } else {
                fence = Some((fence_char, run, code));
            }
            continue;
        }

        if line.trim().is_empty() {
            flush(&mut paragraph, &mut blocks);
            if !matches!(blocks.last(), Some(b) if b.kind == BlockKind::Blank) {
                blocks.push(Block::new(BlockKind::Blank, "\n".to_string()));
            }
        } else if let Some(level) = atx_heading_level(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::new(BlockKind::Heading { level }, format!("{line}\n")));
        } else if let Some((fence_char, run)) = fence_open(line) {
            flush(&mut paragraph, &mut blocks);
            fence = Some((fence_char, run, format!("{line}\n")));
        } else {
            paragraph.push_str(line);
            paragraph.push('\n');
        }
    }

    flush(&mut paragraph, &mut blocks);
    if let Some((_, _, code)) = fence {
        blocks.push(Block::new(BlockKind::CodeBlock, code));
    }
    blocks
}

/// Concatenate blocks back into markdown
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(|block| block.text.as_str()).collect()
}
