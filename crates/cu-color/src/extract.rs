// SPDX-License-Identifier: MIT
//
// Finding hex color literals in arbitrary file contents.
//
// A literal is `#` followed by exactly six hex digits, matched left to right
// without overlap. Nothing looks at what follows the sixth digit, so
// `#1234567` yields `#123456` and leaves the trailing `7` alone.
//
// Matching runs over raw bytes. Files in any ASCII-compatible encoding
// (Latin-1, Windows-1252, broken UTF-8) are scanned, and everything around
// a literal is left byte for byte as it was.

use std::collections::HashSet;
use std::str;
use std::sync::LazyLock;

use regex::bytes::Regex;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Fa-f]{6}").expect("valid regex"));

/// Every hex color literal in `text`, in order, duplicates included.
///
/// The iterator is lazy and borrows from `text`.
pub fn extract_colors(text: &[u8]) -> impl Iterator<Item = &str> {
    // A match is pure ASCII, so the conversion never drops one.
    HEX_COLOR_RE
        .find_iter(text)
        .filter_map(|m| str::from_utf8(m.as_bytes()).ok())
}

/// Each distinct literal once, in order of first appearance.
///
/// Distinctness is exact string equality: `#ABCDEF` and `#abcdef` are both
/// reported.
pub fn distinct_colors(text: &[u8]) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    extract_colors(text).filter(move |c| seen.insert(*c))
}

/// Replace every occurrence of the literal `source` in `text` with
/// `replacement`.
///
/// Only whole literals are candidates, which for a `#RRGGBB` source is the
/// same set of positions a plain substring search finds.
#[must_use]
pub fn replace_color(text: &[u8], source: &str, replacement: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut last = 0;
    for m in HEX_COLOR_RE
        .find_iter(text)
        .filter(|m| m.as_bytes() == source.as_bytes())
    {
        out.extend_from_slice(&text[last..m.start()]);
        out.extend_from_slice(replacement.as_bytes());
        last = m.end();
    }
    out.extend_from_slice(&text[last..]);
    out
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all(text: &str) -> Vec<&str> {
        extract_colors(text.as_bytes()).collect()
    }

    #[test]
    fn finds_a_bare_color() {
        assert_eq!(all("#000000"), vec!["#000000"]);
    }

    #[test]
    fn finds_a_color_inside_css() {
        assert_eq!(all("color:#000000;"), vec!["#000000"]);
    }

    #[test]
    fn skips_short_candidates() {
        assert_eq!(all("a#12345g#abcdef"), vec!["#abcdef"]);
    }

    #[test]
    fn no_matches_in_plain_text() {
        assert!(all("no colors here, just # signs and 123456").is_empty());
        assert!(all("").is_empty());
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let css = "a { color: #FF0000; } b { color: #00ff00; } c { color: #FF0000; }";
        assert_eq!(all(css), vec!["#FF0000", "#00ff00", "#FF0000"]);
    }

    #[test]
    fn longer_runs_are_truncated_not_skipped() {
        assert_eq!(all("#1234567"), vec!["#123456"]);
        assert_eq!(all("#12345678"), vec!["#123456"]);
    }

    #[test]
    fn adjacent_literals_do_not_overlap() {
        assert_eq!(all("#111111#222222"), vec!["#111111", "#222222"]);
        assert_eq!(all("##333333"), vec!["#333333"]);
    }

    #[test]
    fn mixed_case_is_matched_verbatim() {
        assert_eq!(all("#AbCdEf"), vec!["#AbCdEf"]);
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let text = "#bbbbbb #aaaaaa #bbbbbb #AAAAAA #aaaaaa";
        let got: Vec<&str> = distinct_colors(text.as_bytes()).collect();
        assert_eq!(got, vec!["#bbbbbb", "#aaaaaa", "#AAAAAA"]);
    }

    #[test]
    fn works_across_lines_and_unicode() {
        let text = "/* thème */\n:root {\n  --fond: #fafafa;\n  --texte: #0a0a0a;\n}\n";
        assert_eq!(all(text), vec!["#fafafa", "#0a0a0a"]);
    }

    #[test]
    fn scans_bytes_that_are_not_utf8() {
        let text = b"/* \xa9 acme */ a { color: #030303; } \xff#ABCDEF";
        let got: Vec<&str> = extract_colors(text).collect();
        assert_eq!(got, vec!["#030303", "#ABCDEF"]);
    }

    // ── Replacement ──────────────────────────────────────────────────────

    #[test]
    fn replaces_every_occurrence_of_one_literal() {
        let got = replace_color(b"#0a0a0a x #0a0a0a #0b0b0b", "#0a0a0a", "#000000");
        assert_eq!(got, b"#000000 x #000000 #0b0b0b".to_vec());
    }

    #[test]
    fn replacement_is_case_exact() {
        let got = replace_color(b"#ABCDEF #abcdef", "#abcdef", "#000000");
        assert_eq!(got, b"#ABCDEF #000000".to_vec());
    }

    #[test]
    fn replacement_keeps_surrounding_bytes() {
        let got = replace_color(b"\xa9#030303\xff#0303030", "#030303", "#000000");
        assert_eq!(got, b"\xa9#000000\xff#0000000".to_vec());
    }

    #[test]
    fn replacement_without_matches_is_a_copy() {
        assert_eq!(replace_color(b"no colors", "#000000", "#ffffff"), b"no colors".to_vec());
        assert_eq!(replace_color(b"", "#000000", "#ffffff"), Vec::<u8>::new());
    }
}
