//! Chunk text cleanup after splitting

use crate::utils::{
    CITATION_LOOKAHEAD_LINES, MAX_CITATION_STARS, SECTION_END_MARKER, SECTION_START_MARKER,
    is_atx_heading,
};

/// Remove section marker lines, together with one of the blank lines around them.
pub fn strip_section_markers(text: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut skip_blank = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == SECTION_START_MARKER || trimmed == SECTION_END_MARKER {
            skip_blank = output.last().is_none_or(|prev| prev.trim().is_empty());
            continue;
        }
        if skip_blank && trimmed.is_empty() {
            skip_blank = false;
            continue;
        }
        skip_blank = false;
        output.push(line);
    }
    output.join("\n")
}

/// Blank line before every heading that follows text and after every heading
/// that is followed by anything; no blank lines at either end.
pub fn normalize_newlines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut output: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if !is_atx_heading(line) {
            output.push(line);
            continue;
        }
        let prev = i.checked_sub(1).map(|p| lines[p]);
        let next = lines.get(i + 1);
        if prev.is_some_and(|p| !p.trim().is_empty() && !is_atx_heading(p)) {
            output.push("");
        }
        output.push(line);
        if next.is_some_and(|n| !n.trim().is_empty()) {
            output.push("");
        }
    }
    output.join("\n").trim().to_string()
}

/// Inline footnotes marked with escaped asterisks.
///
/// A line containing a reference like `\*\*` is joined with the first of the
/// next ten lines that starts with the same reference: the reference is
/// replaced by `(footnote)`, with the footnote's own reference unescaped, and
/// the footnote line is removed. Longer references are matched first.
pub fn fix_citations(text: &str) -> String {
    let references: Vec<String> = (1..=MAX_CITATION_STARS).rev().map(|n| r"\*".repeat(n)).collect();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();

    let mut i = 0;
    while i < lines.len() {
        let Some(reference) = references.iter().find(|r| lines[i].contains(r.as_str())) else {
            i += 1;
            continue;
        };

        let lookahead_end = (i + CITATION_LOOKAHEAD_LINES + 1).min(lines.len());
        let Some(footnote_index) =
            (i + 1..lookahead_end).find(|&j| lines[j].trim().starts_with(reference.as_str()))
        else {
            i += 1;
            continue;
        };

        let unescaped = reference.replace('\\', "");
        let footnote = lines.remove(footnote_index).replace(reference.as_str(), &unescaped);
        lines[i] = lines[i].replacen(reference.as_str(), &format!("({footnote})"), 1);
        // Same line again: it may hold further references
    }
    lines.join("\n")
}

/// Make the chunk start with an H1 naming the document.
///
/// - an H1 that already contains `title` is kept
/// - an H1 contained in `title` is replaced by `# title`
/// - any other H1 becomes `# title - h1`
/// - without an H1, `# title` is put in front
pub fn prepend_title(text: &str, title: &str) -> String {
    if title.is_empty() {
        return text.to_string();
    }

    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let Some(h1) = first.strip_prefix("# ") else {
        return if text.is_empty() {
            format!("# {title}")
        } else {
            format!("# {title}\n\n{text}")
        };
    };
    if h1.contains(title) {
        return text.to_string();
    }

    let heading = if title.contains(h1) {
        format!("# {title}")
    } else {
        format!("# {title} - {h1}")
    };
    std::iter::once(heading.as_str())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// All cleanup steps, in order.
pub fn finalize_chunk_text(text: &str, title: &str) -> String {
    let text = strip_section_markers(text);
    let text = normalize_newlines(&text);
    let text = fix_citations(&text);
    prepend_title(&text, title)
}
