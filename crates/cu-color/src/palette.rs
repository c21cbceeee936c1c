// SPDX-License-Identifier: MIT
//
// The target palette and nearest-color lookup.
//
// The palette is converted to HSL once, at startup, and never changes for
// the rest of the run. Lookup is a linear scan — palettes are a handful of
// colors and every decision is memoized by the caller, so nothing cleverer
// is needed.

use crate::hex::{ConversionError, HexColor};
use crate::hsl::{Hsl, distance};

/// Factor applied to the user-facing threshold before comparing distances.
const THRESHOLD_SCALE: f64 = 2.5;

// ─── ScaledThreshold ─────────────────────────────────────────────────────────

/// A distance cutoff already multiplied by `sqrt(2.5)`.
///
/// Built once per run from the `--threshold` value so that every file is
/// judged against the same number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledThreshold(f64);

impl ScaledThreshold {
    /// Wrap a value that is already in distance units.
    #[inline]
    #[must_use]
    pub const fn new(scaled: f64) -> Self {
        Self(scaled)
    }

    /// Scale a user-supplied threshold.
    #[must_use]
    pub fn from_user(threshold: f64) -> Self {
        Self(threshold * THRESHOLD_SCALE.sqrt())
    }

    /// The scaled value, in distance units.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

// ─── Nearest ─────────────────────────────────────────────────────────────────

/// Outcome of a palette lookup.
///
/// Both variants carry the color to write. `Unchanged` keeps "nothing was
/// close enough" distinguishable from "the closest entry is identical".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nearest {
    /// A palette entry within the threshold.
    Matched(HexColor),
    /// No entry was close enough; the target maps to itself.
    Unchanged(HexColor),
}

impl Nearest {
    /// The color to substitute for the target.
    #[inline]
    #[must_use]
    pub const fn hex(&self) -> &HexColor {
        match self {
            Self::Matched(hex) | Self::Unchanged(hex) => hex,
        }
    }

    #[inline]
    #[must_use]
    pub fn into_hex(self) -> HexColor {
        match self {
            Self::Matched(hex) | Self::Unchanged(hex) => hex,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────────

/// A palette color paired with its HSL form.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub hex: HexColor,
    pub hsl: Hsl,
}

impl PaletteEntry {
    #[must_use]
    pub fn new(hex: HexColor) -> Self {
        let hsl = Hsl::from_hex(&hex);
        Self { hex, hsl }
    }
}

/// The ordered set of target colors.
///
/// Declaration order matters: when two entries are equally close, the one
/// listed first wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette from color strings, validating each one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError::InvalidFormat`] encountered, or
    /// [`ConversionError::EmptyPalette`] if `colors` is empty.
    pub fn new<I, S>(colors: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = colors
            .into_iter()
            .map(|c| HexColor::parse(c.as_ref()).map(PaletteEntry::new))
            .collect::<Result<Vec<_>, _>>()?;
        if entries.is_empty() {
            return Err(ConversionError::EmptyPalette);
        }
        Ok(Self { entries })
    }

    /// Parse a comma-separated list such as `#000000,#ffffff`.
    ///
    /// Whitespace around each item is ignored; empty items are not.
    ///
    /// # Errors
    ///
    /// Same as [`Palette::new`].
    pub fn parse_list(list: &str) -> Result<Self, ConversionError> {
        if list.trim().is_empty() {
            return Err(ConversionError::EmptyPalette);
        }
        Self::new(list.split(',').map(str::trim))
    }

    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the palette colors in declaration order.
    pub fn colors(&self) -> impl Iterator<Item = &HexColor> {
        self.entries.iter().map(|e| &e.hex)
    }

    /// Find the closest entry to `target`, if it is within `threshold`.
    ///
    /// Ties go to the earliest entry. When nothing is close enough the
    /// result is [`Nearest::Unchanged`] carrying `target_hex` itself.
    #[must_use]
    pub fn nearest_within_threshold(
        &self,
        target_hex: &HexColor,
        target: Hsl,
        threshold: ScaledThreshold,
    ) -> Nearest {
        let mut best: Option<&PaletteEntry> = None;
        let mut best_dist = f64::INFINITY;

        for entry in &self.entries {
            let d = distance(target, entry.hsl);
            if d < best_dist && d <= threshold.get() {
                best_dist = d;
                best = Some(entry);
            }
        }

        best.map_or_else(
            || Nearest::Unchanged(target_hex.clone()),
            |entry| Nearest::Matched(entry.hex.clone()),
        )
    }

    /// Convenience form of [`Palette::nearest_within_threshold`] that
    /// converts the target first.
    #[must_use]
    pub fn nearest(&self, target: &HexColor, threshold: ScaledThreshold) -> Nearest {
        self.nearest_within_threshold(target, Hsl::from_hex(target), threshold)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
