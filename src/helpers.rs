//! String-span utilities shared by the detectors.
//!
//! Small, allocation-light helpers for substring occurrence search and the
//! segment-pairing analysis used by the safe-encapsulation checks.

/// Pair up each segment of `haystack.split(needle)` with the segment that
/// follows it.
///
/// The shell and JS injection detectors use these pairs to inspect the
/// character immediately before and after every occurrence of the needle.
pub fn segment_pairs<'a>(haystack: &'a str, needle: &str) -> Vec<(&'a str, &'a str)> {
    if needle.is_empty() {
        return Vec::new();
    }
    let segments: Vec<&str> = haystack.split(needle).collect();
    let mut pairs = Vec::with_capacity(segments.len().saturating_sub(1));
    for window in segments.windows(2) {
        pairs.push((window[0], window[1]));
    }
    pairs
}

/// Byte spans `(start, end)` of every non-overlapping, ASCII
/// case-insensitive occurrence of `needle` in `haystack`.
///
/// Operates on bytes so spans stay valid offsets into the original string
/// regardless of surrounding multi-byte characters.
pub fn occurrences_ci(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || n.len() > h.len() {
        return Vec::new();
    }
    let mut spans = Vec::new();
    let mut i = 0;
    while i + n.len() <= h.len() {
        if h[i..i + n.len()].eq_ignore_ascii_case(n) {
            spans.push((i, i + n.len()));
            i += n.len();
        } else {
            i += 1;
        }
    }
    spans
}
