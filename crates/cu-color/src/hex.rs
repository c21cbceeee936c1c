// SPDX-License-Identifier: MIT
//
// Hex color literals — the only color syntax the unifier understands.
//
// A `HexColor` is exactly `#` plus six hex digits. Digits may be upper or
// lower case on input, and the original spelling is kept: it is the map key
// during a run and it is what gets written back to disk.

use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure to interpret a string as a `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The text is not `#` followed by exactly six hex digits.
    #[error("invalid hex color {0:?}: expected #RRGGBB")]
    InvalidFormat(String),

    /// A palette list contained no colors at all.
    #[error("palette is empty")]
    EmptyPalette,
}

// ─── HexColor ────────────────────────────────────────────────────────────────

/// A validated `#RRGGBB` color literal.
///
/// Equality and hashing are plain string comparisons, so `#ABCDEF` and
/// `#abcdef` are different values even though they name the same color.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexColor(String);

impl HexColor {
    /// Validate `s` as a `#RRGGBB` literal.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InvalidFormat`] for any other shape,
    /// including `#RGB`, `#RRGGBBAA`, a missing `#`, or surrounding text.
    pub fn parse(s: &str) -> Result<Self, ConversionError> {
        if rgb8(s).is_some() {
            Ok(Self(s.to_string()))
        } else {
            Err(ConversionError::InvalidFormat(s.to_string()))
        }
    }

    /// The literal as written.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three 8-bit channels.
    #[must_use]
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        // Validated in `parse`; the fallback is unreachable.
        rgb8(&self.0).unwrap_or((0, 0, 0))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexColor({})", self.0)
    }
}

impl Borrow<str> for HexColor {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for HexColor {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse `#RRGGBB` into channels, or `None` for any other shape.
fn rgb8(s: &str) -> Option<(u8, u8, u8)> {
    let digits = s.strip_prefix('#')?.as_bytes();
    if digits.len() != 6 {
        return None;
    }
    let r = parse_hex_byte(&digits[0..2])?;
    let g = parse_hex_byte(&digits[2..4])?;
    let b = parse_hex_byte(&digits[4..6])?;
    Some((r, g, b))
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
