// SPDX-License-Identifier: MIT
//
// color-unifier — snap the hex colors in a set of files onto a palette.
//
// This is the binary that wires the crates together:
//
//   cli.rs    → flags → Options
//   cu-engine → Runner: glob → read → substitute → write
//   cu-color  → hex → HSL → nearest palette color
//
// Output contract: the summary (changed files and the replacement map) goes
// to stdout; logs go to stderr. Exit codes: 0 on success, 1 when the run
// fails, 2 for usage errors.

mod cli;

use std::env;
use std::fmt::Write as _;
use std::process;

use cu_engine::{RunReport, Runner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Invocation, Options, USAGE};

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(opts: &Options) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(opts.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

// ─── Summary ────────────────────────────────────────────────────────────────

/// Render the end-of-run summary printed to stdout.
fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();

    let heading = if report.dry_run { "would change" } else { "changed files" };
    if report.changed.is_empty() {
        let _ = writeln!(out, "{heading}: (none)");
    } else {
        let _ = writeln!(out, "{heading}:");
        for path in &report.changed {
            let _ = writeln!(out, "  {}", path.display());
        }
    }

    if report.replacements.is_empty() {
        let _ = writeln!(out, "replacements: (none)");
    } else {
        let _ = writeln!(out, "replacements:");
        for (source, replacement) in &report.replacements {
            let _ = writeln!(out, "  {source} -> {replacement}");
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "skipped:");
        for skipped in &report.skipped {
            let _ = writeln!(out, "  {}", skipped.reason);
        }
    }

    out
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let opts = match cli::parse(env::args().skip(1)) {
        Ok(Invocation::Run(opts)) => opts,
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            return;
        }
        Ok(Invocation::Version) => {
            println!("color-unifier {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(e) => {
            eprintln!("color-unifier: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    init_logging(&opts);
    info!(
        pathname = %opts.pathname,
        colors = %opts.colors,
        threshold = opts.threshold,
        dry = opts.dry,
        "starting"
    );

    let runner = Runner::new(opts.to_config()).unwrap_or_else(|e| {
        eprintln!("color-unifier: {e}");
        process::exit(1);
    });

    match runner.run() {
        Ok(report) => print!("{}", render_summary(&report)),
        Err(e) => {
            eprintln!("color-unifier: {e}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
