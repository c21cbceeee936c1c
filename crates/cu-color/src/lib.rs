// SPDX-License-Identifier: MIT
//
// cu-color — color math for color-unifier.
//
// Everything needed to decide what a hex literal should become:
//
//   hex.rs      → HexColor (validated `#RRGGBB`) and ConversionError
//   hsl.rs      → hex → HSL conversion and the cylindrical distance metric
//   palette.rs  → the target palette and nearest-within-threshold lookup
//   extract.rs  → finding and replacing hex literals in raw bytes
//
// No I/O lives here. The file-walking side is in cu-engine.

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]

pub mod extract;
pub mod hex;
pub mod hsl;
pub mod palette;

pub use extract::{distinct_colors, extract_colors, replace_color};
pub use hex::{ConversionError, HexColor};
pub use hsl::{Hsl, distance, to_hsl};
pub use palette::{Nearest, Palette, PaletteEntry, ScaledThreshold};
