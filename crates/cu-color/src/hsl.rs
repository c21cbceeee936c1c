// SPDX-License-Identifier: MIT
//
// HSL conversion and the cylindrical distance metric.
//
// Every channel is normalized to [0, 1], hue included: a hue of 0.5 sits
// opposite 0.0 on the color wheel, and 1.0 wraps back to 0.0. Palette
// colors and file colors both go through `to_hsl`, so only relative hue
// matters.
//
//   #RRGGBB → (r, g, b) ∈ [0,1]³ → (h, s, l) ∈ [0,1) × [0,1] × [0,1]

use crate::hex::{ConversionError, HexColor};

// ─── Hsl ─────────────────────────────────────────────────────────────────────

/// A color in hue/saturation/lightness form.
///
/// Only produced by conversion from a [`HexColor`] (or 8-bit channels), so
/// every value has its components in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

impl Hsl {
    /// Test fixtures only; outside tests an `Hsl` comes from a conversion.
    #[cfg(test)]
    pub(crate) const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Hue position on the circle, in [0, 1).
    #[inline]
    #[must_use]
    pub const fn h(self) -> f64 {
        self.h
    }

    /// Saturation, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn s(self) -> f64 {
        self.s
    }

    /// Lightness, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn l(self) -> f64 {
        self.l
    }

    /// Convert 8-bit sRGB channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let (h, s, l) = rgb_to_hsl(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        );
        Self { h, s, l }
    }

    /// Convert a validated hex literal.
    #[must_use]
    pub fn from_hex(hex: &HexColor) -> Self {
        let (r, g, b) = hex.to_rgb8();
        Self::from_rgb8(r, g, b)
    }

    /// Whether this color has no saturation (a gray).
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.s == 0.0
    }

    /// Distance to another color. See [`distance`].
    #[inline]
    #[must_use]
    pub fn distance(self, other: &Self) -> f64 {
        distance(self, *other)
    }
}

/// Convert a `#RRGGBB` string to HSL.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidFormat`] when `hex` is not exactly `#`
/// followed by six hex digits.
pub fn to_hsl(hex: &str) -> Result<Hsl, ConversionError> {
    HexColor::parse(hex).map(|c| Hsl::from_hex(&c))
}

/// Dissimilarity between two HSL colors.
///
/// Euclidean distance over (h, s, l) where the hue axis is circular: the
/// hue difference takes the short way round, so it never exceeds 0.5.
#[must_use]
pub fn distance(a: Hsl, b: Hsl) -> f64 {
    let dh = hue_diff(a.h, b.h);
    let ds = a.s - b.s;
    let dl = a.l - b.l;
    dl.mul_add(dl, dh.mul_add(dh, ds * ds)).sqrt()
}

// ─── Conversion math ─────────────────────────────────────────────────────────

/// Shortest arc between two hues on the unit circle.
#[inline]
fn hue_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > 0.5 { 1.0 - d } else { d }
}

/// sRGB (0.0–1.0) → HSL with hue in sextants / 6.
fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let delta = max - min;
    if delta == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    #[allow(clippy::float_cmp)]
    let sextant = if max == r {
        let h = (g - b) / delta;
        if h < 0.0 { h + 6.0 } else { h }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let h = sextant / 6.0;
    // 8-bit inputs keep this strictly below 1.0; the wrap guards rounding.
    let h = if h >= 1.0 { h - 1.0 } else { h };

    (h, s.clamp(0.0, 1.0), l)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
