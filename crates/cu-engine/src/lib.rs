//! # cu-engine — Substitution engine for color-unifier
//!
//! Turns the color math in `cu-color` into file rewrites:
//!
//! - **[`substitute`]** — `ReplacementMap` memoization and the per-text
//!   substitution pass
//! - **[`run`]** — `Runner`: glob expansion, the plan/commit loop over files,
//!   and the `RunReport` summary
//! - **[`write`]** — atomic replacement of a file's contents
//! - **[`error`]** — `RunError`, the single error type a run can fail with
//!
//! Everything is sequential. The replacement map is owned by the runner and
//! threaded through each file by `&mut`, so a decision made for one file is
//! reused by every later file in the same run.

pub mod error;
pub mod run;
pub mod substitute;
pub mod write;

pub use error::RunError;
pub use run::{ErrorPolicy, RunConfig, RunReport, Runner, Skipped};
pub use substitute::{ReplacementMap, Substitution, process_text};
