//! Substitution — rewriting the colors in one piece of text.
//!
//! For each distinct hex literal in the text (in order of first appearance)
//! the engine asks the [`ReplacementMap`] for a decision, computing one from
//! the palette on a miss, then replaces every occurrence of the literal.
//!
//! Text is handled as raw bytes and does not have to be UTF-8. Bytes outside
//! the rewritten literals come out exactly as they went in.
//!
//! # Ordering
//!
//! Replacements are applied one literal at a time, each over the output of
//! the previous one. If a replacement happens to equal a literal that is
//! processed later, the later pass rewrites it again. The candidate list is
//! taken from the input text, so that later pass only runs when the literal
//! was present originally.

use std::collections::BTreeMap;

use cu_color::{ConversionError, HexColor, Palette, ScaledThreshold, distinct_colors, replace_color};
use tracing::debug;

// ---------------------------------------------------------------------------
// ReplacementMap
// ---------------------------------------------------------------------------

/// Memoized `source → replacement` decisions for one run.
///
/// Insert-once: after a source color has a decision, that decision is
/// returned for the rest of the run and never recomputed or changed.
/// Iteration is sorted by source literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    map: BTreeMap<HexColor, HexColor>,
    hits: usize,
}

impl ReplacementMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The decision recorded for `source`, if any.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&HexColor> {
        self.map.get(source)
    }

    /// Number of distinct source colors decided so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// How many lookups were answered from the map without touching the
    /// palette.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// All decisions, sorted by source literal.
    pub fn iter(&self) -> impl Iterator<Item = (&HexColor, &HexColor)> {
        self.map.iter()
    }

    /// Return the replacement for `source`, deciding it on first sight.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidFormat`] if `source` is not a
    /// `#RRGGBB` literal. Nothing is recorded in that case.
    pub fn resolve(
        &mut self,
        source: &str,
        palette: &Palette,
        threshold: ScaledThreshold,
    ) -> Result<HexColor, ConversionError> {
        if let Some(hit) = self.map.get(source) {
            self.hits += 1;
            return Ok(hit.clone());
        }

        let target = HexColor::parse(source)?;
        let nearest = palette.nearest(&target, threshold);
        debug!(
            source = %target,
            replacement = %nearest.hex(),
            matched = nearest.is_match(),
            "new replacement"
        );
        let replacement = nearest.into_hex();
        self.map.insert(target, replacement.clone());
        Ok(replacement)
    }
}

impl<'a> IntoIterator for &'a ReplacementMap {
    type Item = (&'a HexColor, &'a HexColor);
    type IntoIter = std::collections::btree_map::Iter<'a, HexColor, HexColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Result of running the substitution pass over one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The rewritten bytes (equal to the input when nothing changed).
    pub contents: Vec<u8>,
    /// Whether `contents` differs from the input.
    pub changed: bool,
}

/// Rewrite every hex color in `text` to its palette replacement.
///
/// Decisions are read from and recorded into `replacements`, so calling this
/// for several files with the same map resolves each color only once.
///
/// # Errors
///
/// Propagates a [`ConversionError`] from [`ReplacementMap::resolve`].
pub fn process_text(
    text: &[u8],
    palette: &Palette,
    threshold: ScaledThreshold,
    replacements: &mut ReplacementMap,
) -> Result<Substitution, ConversionError> {
    let mut out = text.to_vec();

    for source in distinct_colors(text) {
        let replacement = replacements.resolve(source, palette, threshold)?;
        if replacement.as_str() != source {
            out = replace_color(&out, source, replacement.as_str());
        }
    }

    let changed = out != text;
    Ok(Substitution { contents: out, changed })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn palette(colors: &[&str]) -> Palette {
        Palette::new(colors).unwrap()
    }

    /// The rewritten text, for texts that stay UTF-8.
    struct Rewritten {
        text: String,
        changed: bool,
    }

    fn run(text: &str, palette: &Palette, threshold: f64, map: &mut ReplacementMap) -> Rewritten {
        let got = process_text(text.as_bytes(), palette, ScaledThreshold::from_user(threshold), map).unwrap();
        Rewritten {
            text: String::from_utf8(got.contents).unwrap(),
            changed: got.changed,
        }
    }

    // ── Single text ──────────────────────────────────────────────────────

    #[test]
    fn near_black_becomes_black() {
        let p = palette(&["#ffffff", "#000000"]);
        let mut map = ReplacementMap::new();
        let got = run("border: #030303;", &p, 0.5, &mut map);
        assert_eq!(got.text, "border: #000000;");
        assert!(got.changed);
        assert_eq!(map.get("#030303").map(HexColor::as_str), Some("#000000"));
    }

    #[test]
    fn out_of_threshold_maps_to_itself() {
        let p = palette(&["#ffffff", "#000000"]);
        let mut map = ReplacementMap::new();
        let got = run("border: #030303;", &p, 0.005, &mut map);
        assert_eq!(got.text, "border: #030303;");
        assert!(!got.changed);
        assert_eq!(map.get("#030303").map(HexColor::as_str), Some("#030303"));
    }

    #[test]
    fn text_without_colors_is_untouched() {
        let p = palette(&["#000000"]);
        let mut map = ReplacementMap::new();
        let got = run("body { margin: 0 }", &p, 0.5, &mut map);
        assert_eq!(got.text, "body { margin: 0 }");
        assert!(!got.changed);
        assert!(map.is_empty());
    }

    #[test]
    fn replaces_every_occurrence() {
        let p = palette(&["#000000", "#ffffff"]);
        let mut map = ReplacementMap::new();
        let got = run("a{color:#0a0a0a}b{color:#0a0a0a;background:#fefefe}", &p, 0.1, &mut map);
        assert_eq!(got.text, "a{color:#000000}b{color:#000000;background:#ffffff}");
        assert_eq!(map.len(), 2);
        assert_eq!(map.hits(), 0);
    }

    #[test]
    fn palette_colors_stay_put() {
        let p = palette(&["#000000", "#ffffff"]);
        let mut map = ReplacementMap::new();
        let got = run("#000000 #ffffff", &p, 0.1, &mut map);
        assert!(!got.changed);
        assert_eq!(map.get("#000000").map(HexColor::as_str), Some("#000000"));
    }

    #[test]
    fn case_variants_are_decided_separately() {
        let p = palette(&["#abcdef"]);
        let mut map = ReplacementMap::new();
        let got = run("#ABCDEF #abcdef #ABCDEE", &p, 0.1, &mut map);
        assert_eq!(got.text, "#abcdef #abcdef #abcdef");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("#ABCDEF").map(HexColor::as_str), Some("#abcdef"));
    }

    #[test]
    fn later_pass_sees_earlier_replacements() {
        // Seed #000000 → #010101 from another palette, so that the first
        // rewrite (#0b0b0b → #000000) produces a literal the second pass
        // rewrites again.
        let mut map = ReplacementMap::new();
        map.resolve("#000000", &palette(&["#010101"]), ScaledThreshold::from_user(0.1))
            .unwrap();

        let p = palette(&["#000000"]);
        let got = run("#0b0b0b #000000", &p, 0.1, &mut map);
        assert_eq!(got.text, "#010101 #010101");
        assert_eq!(
            map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
            vec![("#000000", "#010101"), ("#0b0b0b", "#000000")]
        );
    }

    #[test]
    fn memoized_decision_is_reused_verbatim() {
        // Seed a decision that the palette would not make, then check that
        // the text pass honors the map instead of recomputing.
        let p = palette(&["#000000"]);
        let mut map = ReplacementMap::new();
        let first = map.resolve("#0b0b0b", &p, ScaledThreshold::from_user(0.1)).unwrap();
        assert_eq!(first.as_str(), "#000000");

        let got = run("x: #0b0b0b", &p, 0.0, &mut map);
        assert_eq!(got.text, "x: #000000");
        assert_eq!(map.hits(), 1);
    }

    // ── Across files ─────────────────────────────────────────────────────

    #[test]
    fn shared_map_resolves_each_color_once() {
        let p = palette(&["#ffffff", "#000000"]);
        let mut map = ReplacementMap::new();
        let a = run("a { color: #050505 }", &p, 0.5, &mut map);
        let b = run("b { border: 1px solid #050505 }", &p, 0.5, &mut map);

        assert_eq!(a.text, "a { color: #000000 }");
        assert_eq!(b.text, "b { border: 1px solid #000000 }");
        assert_eq!(map.len(), 1);
        assert_eq!(map.hits(), 1);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let p = palette(&["#1e1e2e", "#cdd6f4", "#f38ba8"]);
        let text = ":root { --bg: #1f1f2f; --fg: #cdd5f3; --red: #f38ba9; --odd: #00ff00; }";

        let mut map = ReplacementMap::new();
        let once = run(text, &p, 0.1, &mut map);
        assert!(once.changed);

        let mut fresh = ReplacementMap::new();
        let twice = run(&once.text, &p, 0.1, &mut fresh);
        assert_eq!(twice.text, once.text);
        assert!(!twice.changed);
    }

    #[test]
    fn non_utf8_bytes_survive_a_rewrite() {
        let p = palette(&["#ffffff", "#000000"]);
        let mut map = ReplacementMap::new();
        let input = b"/* \xa9 acme */ a { color: #030303; }\xe9";
        let got = process_text(input, &p, ScaledThreshold::from_user(0.5), &mut map).unwrap();
        assert_eq!(got.contents, b"/* \xa9 acme */ a { color: #000000; }\xe9".to_vec());
        assert!(got.changed);
    }

    #[test]
    fn invalid_literal_is_rejected_by_resolve() {
        let p = palette(&["#000000"]);
        let mut map = ReplacementMap::new();
        let err = map.resolve("#00000g", &p, ScaledThreshold::from_user(0.1));
        assert_eq!(err, Err(ConversionError::InvalidFormat("#00000g".to_string())));
        assert!(map.is_empty());
    }
}
