//! Small text helpers shared by the normalizer and the splitter

use crate::utils::constants::CHARS_PER_TOKEN;

/// Approximate token count of `text`: characters divided by five, rounded down.
#[inline]
pub fn token_length(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Index of the candidate closest to `target`.
///
/// Ties resolve to the earliest candidate. Returns `None` for an empty slice.
pub fn nearest(candidates: &[usize], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &candidate in candidates {
        let distance = (candidate as f64 - target).abs();
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Whether `line` is an ATX heading (`#` to `######` followed by whitespace or end of line).
///
/// Up to three leading spaces are allowed, as in CommonMark.
pub fn is_atx_heading(line: &str) -> bool {
    atx_heading_level(line).is_some()
}

/// Level of an ATX heading line, or `None` if the line is not a heading.
pub fn atx_heading_level(line: &str) -> Option<u8> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let hashes = rest.len() - rest.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match rest[hashes..].chars().next() {
        None => Some(hashes as u8),
        Some(c) if c.is_whitespace() => Some(hashes as u8),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_length_counts_chars_not_bytes() {
        assert_eq!(token_length("abcde"), 1);
        assert_eq!(token_length("abcd"), 0);
        assert_eq!(token_length("ééééé"), 1);
    }

    #[test]
    fn nearest_prefers_first_on_tie() {
        assert_eq!(nearest(&[2, 6], 4.0), Some(2));
        assert_eq!(nearest(&[1, 5, 9], 6.0), Some(5));
        assert_eq!(nearest(&[], 3.0), None);
    }

    #[test]
    fn atx_heading_detection() {
        assert_eq!(atx_heading_level("# Title"), Some(1));
        assert_eq!(atx_heading_level("   ### Deep"), Some(3));
        assert_eq!(atx_heading_level("##"), Some(2));
        assert_eq!(atx_heading_level("#hashtag"), None);
        assert_eq!(atx_heading_level("    # code"), None);
        assert_eq!(atx_heading_level("####### seven"), None);
    }
}
