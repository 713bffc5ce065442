//! Heading-aware chunk assembly
//!
//! Blocks are fed one at a time into a [`ChunkAssembler`]. Boundaries
//! (headings at or above the target level, and depending on the policy
//! section markers and implicit headings) call [`ChunkAssembler::finish_chunk`],
//! which either keeps growing the pending chunk or emits it.
//!
//! Three block lists are tracked:
//! - `current`: the chunk since the last boundary, seeded with its heading context
//! - `previous_unfinished`: completed material that may still absorb `current`
//! - `previous_plus_current`: everything appended since the last emission
//!
//! Chunks above the target size are re-split with the next [`SplitPolicy`],
//! bottoming out in the destructive line splitter.

use super::Chunk;
use super::blocks::{Block, BlockKind, parse_blocks, render_blocks};
use super::destructive::destructive_split_to_chunks;
use super::policy::SplitPolicy;
use crate::config::ChunkingConfig;
use crate::utils::{SECTION_END_MARKER, SECTION_START_MARKER, token_length};

pub(crate) struct ChunkAssembler<'a> {
    config: &'a ChunkingConfig,
    policy: SplitPolicy,
    heading_stack: Vec<Block>,
    current: Vec<Block>,
    previous_unfinished: Vec<Block>,
    previous_plus_current: Vec<Block>,
}

/// Blocks that carry no content of their own
fn is_semantically_empty(block: &Block) -> bool {
    block.heading_level().is_some()
        || block.is_implicit_heading()
        || block.is_blank()
        || block.is_marker(SECTION_START_MARKER)
        || block.is_marker(SECTION_END_MARKER)
}

impl<'a> ChunkAssembler<'a> {
    pub(crate) fn new(config: &'a ChunkingConfig, policy: SplitPolicy) -> Self {
        Self {
            config,
            policy,
            heading_stack: Vec::new(),
            current: Vec::new(),
            previous_unfinished: Vec::new(),
            previous_plus_current: Vec::new(),
        }
    }

    /// A fresh chunk carrying the headings of the enclosing sections
    fn seeded(&self) -> Vec<Block> {
        self.heading_stack.clone()
    }

    fn append(&mut self, block: Block) {
        self.previous_plus_current.push(block.clone());
        self.current.push(block);
    }

    /// Close the current chunk at a boundary.
    ///
    /// With `allow_merge`, material stays pending as long as everything since
    /// the last emission fits the target. Otherwise the pending material is
    /// emitted and the current chunk either becomes the new pending material
    /// or, when too large or not mergeable, is split further and emitted.
    pub(crate) fn finish_chunk(mut self, allow_merge: bool, sink: &mut Vec<Chunk>) -> Self {
        let target = self.config.target_chunk_size();

        while self.current.last().is_some_and(Block::is_blank) {
            self.current.pop();
        }

        let previous_plus_current_len = token_length(&render_blocks(&self.previous_plus_current));
        let current_md = render_blocks(&self.current);
        let current_len = token_length(&current_md);
        let current_is_empty = self.current.iter().all(is_semantically_empty);

        if allow_merge && previous_plus_current_len <= target {
            // Still room: keep growing
            self.current = self.seeded();
            if current_is_empty {
                let mut merged = self.previous_unfinished.clone();
                merged.extend(self.current.iter().cloned());
                self.previous_plus_current = merged;
            } else {
                self.previous_unfinished = self.previous_plus_current.clone();
            }
            return self;
        }

        let unfinished_md = render_blocks(&std::mem::take(&mut self.previous_unfinished));
        if !unfinished_md.trim().is_empty() {
            sink.push(Chunk::new(unfinished_md));
        }

        if current_len > target || !allow_merge {
            if !current_is_empty {
                sink.extend(split_more_to_chunks(&current_md, self.config, self.policy));
            }
            self.current = self.seeded();
            self.previous_plus_current = self.seeded();
        } else {
            if current_is_empty {
                self.previous_plus_current = self.seeded();
            } else {
                self.previous_plus_current = self.current.clone();
                self.previous_unfinished = self.current.clone();
            }
            self.current = self.seeded();
        }
        self
    }

    /// Feed one block, finishing the current chunk first if it is a boundary.
    pub(crate) fn push_block(mut self, block: Block, sink: &mut Vec<Chunk>) -> Self {
        match block.kind {
            BlockKind::Paragraph
                if block.is_marker(SECTION_START_MARKER) || block.is_marker(SECTION_END_MARKER) =>
            {
                // Split on both ends: content between sections may lack markers
                if self.policy.split_sections {
                    self = self.finish_chunk(true, sink);
                } else {
                    // Kept until post-processing strips it
                    self.append(block);
                }
            }
            BlockKind::Paragraph if block.is_implicit_heading() => {
                if self.policy.split_implicit_headings {
                    self = self.finish_chunk(true, sink);
                }
                self.append(block);
            }
            BlockKind::Paragraph => self.append(block),
            BlockKind::Heading { .. } if block.is_empty_heading() => {}
            BlockKind::Heading { level } if level <= self.policy.target_heading_level => {
                while self
                    .heading_stack
                    .last()
                    .and_then(Block::heading_level)
                    .is_some_and(|top| top >= level)
                {
                    self.heading_stack.pop();
                }
                // Shallower headings are hard cuts
                let allow_merge = level == self.policy.target_heading_level;
                self = self.finish_chunk(allow_merge, sink);
                self.heading_stack.push(block.clone());
                self.append(block);
            }
            BlockKind::Heading { .. } => self.append(block),
            BlockKind::CodeBlock | BlockKind::Blank => {
                let repeated_blank = self.current.len() > 1
                    && self.current.last().is_some_and(Block::is_blank)
                    && block.is_blank();
                if !repeated_blank {
                    self.append(block);
                }
            }
        }
        self
    }
}

/// Split markdown into chunks under one policy.
pub(crate) fn do_split_to_chunks(
    markdown: &str,
    config: &ChunkingConfig,
    policy: SplitPolicy,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let assembler = parse_blocks(markdown)
        .into_iter()
        .fold(ChunkAssembler::new(config, policy), |assembler, block| {
            assembler.push_block(block, &mut chunks)
        });
    assembler.finish_chunk(false, &mut chunks);
    chunks
}

/// Return `markdown` as one chunk if it fits, otherwise re-split it with
/// the next finer policy (or destructively once the ladder is exhausted).
pub(crate) fn split_more_to_chunks(
    markdown: &str,
    config: &ChunkingConfig,
    policy: SplitPolicy,
) -> Vec<Chunk> {
    if token_length(markdown) <= config.target_chunk_size() {
        return vec![Chunk::new(markdown.to_string())];
    }
    match policy.escalate() {
        Some(next) => {
            tracing::debug!(
                tokens = token_length(markdown),
                level = next.target_heading_level,
                split_sections = next.split_sections,
                split_implicit_headings = next.split_implicit_headings,
                "Chunk above target, splitting further"
            );
            do_split_to_chunks(markdown, config, next)
        }
        None => destructive_split_to_chunks(markdown, config.max_chunk_size()),
    }
}
