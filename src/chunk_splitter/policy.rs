//! Escalation ladder for oversized chunks
//!
//! A chunk that is still above the target size is re-split with a finer
//! policy: first by deeper headings, then additionally at section markers,
//! then at every heading level, and finally at implicit (bold) headings.
//! When the ladder is exhausted the destructive line splitter takes over.

/// Which boundaries force a new chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPolicy {
    /// Headings at or above this level finish the current chunk
    pub target_heading_level: u8,
    /// Section start/end markers finish the current chunk
    pub split_sections: bool,
    /// Bold-only paragraphs finish the current chunk
    pub split_implicit_headings: bool,
}

impl SplitPolicy {
    pub fn starting_at(target_heading_level: u8) -> Self {
        Self {
            target_heading_level,
            split_sections: false,
            split_implicit_headings: false,
        }
    }

    /// The next, finer policy, or `None` once every structural split is exhausted.
    pub fn escalate(self) -> Option<Self> {
        let next = if self.target_heading_level < 2 {
            Self::starting_at(self.target_heading_level + 1)
        } else if !self.split_sections {
            // Sections usually wrap h3+ headings, so split by section before h3
            Self {
                target_heading_level: 2,
                split_sections: true,
                split_implicit_headings: false,
            }
        } else if self.target_heading_level < 6 {
            Self {
                target_heading_level: self.target_heading_level + 1,
                split_sections: true,
                split_implicit_headings: false,
            }
        } else if !self.split_implicit_headings {
            Self {
                target_heading_level: 6,
                split_sections: true,
                split_implicit_headings: true,
            }
        } else {
            return None;
        };
        Some(next)
    }
}
