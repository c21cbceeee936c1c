//! Runner — one invocation of the unifier over a set of files.
//!
//! A run has two phases:
//!
//! 1. **Plan** — expand the glob, read every matched file, and run the
//!    substitution pass over it with a shared [`ReplacementMap`]. Nothing is
//!    written yet, so a bad file aborts the run with the tree untouched.
//! 2. **Commit** — write back each file whose text changed (skipped entirely
//!    in dry-run mode).
//!
//! The palette is validated in [`Runner::new`], before the glob is even
//! expanded.

use std::fs;
use std::path::{Path, PathBuf};

use cu_color::{Palette, ScaledThreshold};
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::substitute::{ReplacementMap, process_text};
use crate::write::replace_file;

/// Default for `--threshold`.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a single file cannot be read or written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the run at the first failure.
    #[default]
    Abort,
    /// Log the failure, record it in [`RunReport::skipped`], and go on.
    Skip,
}

/// Everything a run needs, as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Glob selecting the files to process.
    pub pattern: String,
    /// Comma-separated palette, e.g. `#000000,#ffffff`.
    pub colors: String,
    /// Unscaled distance threshold.
    pub threshold: f64,
    /// Report what would change without writing.
    pub dry_run: bool,
    pub on_error: ErrorPolicy,
}

impl RunConfig {
    #[must_use]
    pub fn new(pattern: impl Into<String>, colors: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            colors: colors.into(),
            threshold: DEFAULT_THRESHOLD,
            dry_run: false,
            on_error: ErrorPolicy::Abort,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A file left out of the run under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Files whose contents changed, in glob order. In dry-run mode these
    /// are the files that would have been written.
    pub changed: Vec<PathBuf>,
    /// Every replacement decision made during the run.
    pub replacements: ReplacementMap,
    /// Files that failed under [`ErrorPolicy::Skip`].
    pub skipped: Vec<Skipped>,
    /// Number of files read.
    pub scanned: usize,
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// A validated run, ready to execute.
#[derive(Debug, Clone)]
pub struct Runner {
    pattern: String,
    palette: Palette,
    threshold: ScaledThreshold,
    dry_run: bool,
    on_error: ErrorPolicy,
}

impl Runner {
    /// Validate the palette and scale the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Palette`] if any palette color is malformed or the
    /// palette is empty.
    pub fn new(config: RunConfig) -> Result<Self, RunError> {
        let palette = Palette::parse_list(&config.colors).map_err(RunError::Palette)?;
        Ok(Self {
            pattern: config.pattern,
            palette,
            threshold: ScaledThreshold::from_user(config.threshold),
            dry_run: config.dry_run,
            on_error: config.on_error,
        })
    }

    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub const fn threshold(&self) -> ScaledThreshold {
        self.threshold
    }

    /// Run the plan and commit phases.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Pattern`] for a malformed glob. Under
    /// [`ErrorPolicy::Abort`], also returns the first [`RunError::Read`] or
    /// [`RunError::Write`].
    pub fn run(&self) -> Result<RunReport, RunError> {
        let paths = self.expand()?;
        info!(pattern = %self.pattern, files = paths.len(), "matched files");

        let mut report = RunReport {
            dry_run: self.dry_run,
            ..RunReport::default()
        };
        let mut replacements = ReplacementMap::new();

        // Plan.
        let mut pending = Vec::new();
        for path in paths {
            let text = match fs::read(&path) {
                Ok(text) => text,
                Err(source) => {
                    self.fail(RunError::Read { path, source }, &mut report)?;
                    continue;
                }
            };
            report.scanned += 1;

            let result = process_text(&text, &self.palette, self.threshold, &mut replacements)?;
            debug!(path = %path.display(), changed = result.changed, "planned");
            if result.changed {
                pending.push((path, result.contents));
            }
        }

        // Commit.
        for (path, text) in pending {
            if !self.dry_run {
                if let Err(source) = replace_file(&path, &text) {
                    self.fail(RunError::Write { path, source }, &mut report)?;
                    continue;
                }
                info!(path = %path.display(), "wrote");
            }
            report.changed.push(path);
        }

        debug!(
            decisions = replacements.len(),
            reused = replacements.hits(),
            "replacement map"
        );
        report.replacements = replacements;
        Ok(report)
    }

    /// Expand the glob to regular files, in the order the glob yields them.
    fn expand(&self) -> Result<Vec<PathBuf>, RunError> {
        let entries = glob::glob(&self.pattern).map_err(|source| RunError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => {
                    debug!(path = %path.display(), "skipping directory");
                }
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path");
                }
            }
        }
        Ok(paths)
    }

    /// Apply the error policy to a per-file failure.
    fn fail(&self, err: RunError, report: &mut RunReport) -> Result<(), RunError> {
        match self.on_error {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Skip => {
                warn!("{err}");
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                report.skipped.push(Skipped {
                    path,
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
