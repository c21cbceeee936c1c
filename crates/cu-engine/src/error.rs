//! Errors that end a run.

use std::io;
use std::path::{Path, PathBuf};

use cu_color::ConversionError;
use thiserror::Error;

/// Why a run stopped (or, under [`ErrorPolicy::Skip`](crate::ErrorPolicy),
/// why a file was left out).
#[derive(Debug, Error)]
pub enum RunError {
    /// A `--colors` entry is not a `#RRGGBB` literal, or the list is empty.
    #[error("invalid palette: {0}")]
    Palette(#[source] ConversionError),

    /// A color found in a file could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The `--pathname` glob is malformed.
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A matched file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A changed file could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// The file involved, for per-file I/O failures.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}
