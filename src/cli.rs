// SPDX-License-Identifier: MIT
//
// Command-line parsing.
//
// Hand-rolled over `std::env::args`. Accepted spellings: `--flag value`,
// `--flag=value`, `-f value`, `-fvalue`, clustered switches (`-dk`), and an
// explicit boolean on switches (`--dry=false`).

use cu_engine::run::DEFAULT_THRESHOLD;
use cu_engine::{ErrorPolicy, RunConfig};
use thiserror::Error;

pub const USAGE: &str = "\
Usage: color-unifier --pathname <GLOB> --colors <HEX,HEX,...> [options]

Rewrite every #RRGGBB color in the matched files to the closest palette
color within the threshold.

Options:
  -p, --pathname <GLOB>     files to process (required)
  -c, --colors <LIST>       palette, e.g. #000000,#ffffff (required)
      --threshold <FLOAT>   maximum distance to snap a color (default 0.1)
  -d, --dry                 report changes without writing files
  -k, --keep-going          skip files that cannot be read or written
  -v, --verbose             more logging (repeat for trace)
  -h, --help                print this help
  -V, --version             print the version
";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parsed options for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub pathname: String,
    pub colors: String,
    pub threshold: f64,
    pub dry: bool,
    pub keep_going: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl Options {
    /// The library-side configuration for these options.
    #[must_use]
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            pattern: self.pathname.clone(),
            colors: self.colors.clone(),
            threshold: self.threshold,
            dry_run: self.dry,
            on_error: if self.keep_going {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            },
        }
    }

    /// Log filter directive implied by `-v` count.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Options),
    Help,
    Version,
}

/// A usage error. The binary prints it with [`USAGE`] and exits with 2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("flag {0} needs a value")]
    MissingValue(String),

    #[error("invalid value for {flag}: {value:?}")]
    InvalidValue { flag: String, value: String },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("path and colors are required")]
    MissingRequired,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Flags that consume a value.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ValueFlag {
    Pathname,
    Colors,
    Threshold,
}

/// On/off flags.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Switch {
    Dry,
    KeepGoing,
    Verbose,
    Help,
    Version,
}

/// A flag, independent of spelling.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Flag {
    Value(ValueFlag),
    Switch(Switch),
}

impl Flag {
    fn from_long(name: &str) -> Option<Self> {
        Some(match name {
            "pathname" => Self::Value(ValueFlag::Pathname),
            "colors" => Self::Value(ValueFlag::Colors),
            "threshold" => Self::Value(ValueFlag::Threshold),
            "dry" => Self::Switch(Switch::Dry),
            "keep-going" => Self::Switch(Switch::KeepGoing),
            "verbose" => Self::Switch(Switch::Verbose),
            "help" => Self::Switch(Switch::Help),
            "version" => Self::Switch(Switch::Version),
            _ => return None,
        })
    }

    const fn from_short(c: char) -> Option<Self> {
        Some(match c {
            'p' => Self::Value(ValueFlag::Pathname),
            'c' => Self::Value(ValueFlag::Colors),
            'd' => Self::Switch(Switch::Dry),
            'k' => Self::Switch(Switch::KeepGoing),
            'v' => Self::Switch(Switch::Verbose),
            'h' => Self::Switch(Switch::Help),
            'V' => Self::Switch(Switch::Version),
            _ => return None,
        })
    }
}

#[derive(Default)]
struct Builder {
    pathname: Option<String>,
    colors: Option<String>,
    threshold: Option<f64>,
    dry: bool,
    keep_going: bool,
    verbose: u8,
    help: bool,
    version: bool,
}

impl Builder {
    fn set_value(&mut self, flag: ValueFlag, spelled: &str, value: String) -> Result<(), CliError> {
        match flag {
            ValueFlag::Pathname => self.pathname = Some(value),
            ValueFlag::Colors => self.colors = Some(value),
            ValueFlag::Threshold => self.threshold = Some(parse_threshold(spelled, &value)?),
        }
        Ok(())
    }

    /// Record a switch, with an optional explicit `=true`/`=false`.
    fn set_switch(&mut self, flag: Switch, spelled: &str, value: Option<&str>) -> Result<(), CliError> {
        let on = match value {
            Some(v) => parse_bool(v).ok_or_else(|| CliError::InvalidValue {
                flag: spelled.to_string(),
                value: v.to_string(),
            })?,
            None => true,
        };
        match flag {
            Switch::Dry => self.dry = on,
            Switch::KeepGoing => self.keep_going = on,
            Switch::Verbose if on => self.verbose = self.verbose.saturating_add(1),
            Switch::Verbose => self.verbose = 0,
            Switch::Help => self.help = on,
            Switch::Version => self.version = on,
        }
        Ok(())
    }

    fn finish(self) -> Result<Invocation, CliError> {
        if self.help {
            return Ok(Invocation::Help);
        }
        if self.version {
            return Ok(Invocation::Version);
        }
        match (self.pathname, self.colors) {
            (Some(pathname), Some(colors)) if !pathname.is_empty() && !colors.is_empty() => {
                Ok(Invocation::Run(Options {
                    pathname,
                    colors,
                    threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
                    dry: self.dry,
                    keep_going: self.keep_going,
                    verbose: self.verbose,
                }))
            }
            _ => Err(CliError::MissingRequired),
        }
    }
}

/// Parse the arguments after the program name.
///
/// # Errors
///
/// Returns a [`CliError`] for unknown flags, missing or malformed values,
/// stray positional arguments, or a missing `--pathname` / `--colors`.
pub fn parse<I>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut b = Builder::default();

    while let Some(arg) = args.next() {
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = long
                .split_once('=')
                .map_or((long, None), |(n, v)| (n, Some(v)));
            let spelled = format!("--{name}");
            let flag = Flag::from_long(name).ok_or_else(|| CliError::UnknownFlag(spelled.clone()))?;

            match flag {
                Flag::Value(flag) => {
                    let value = match inline {
                        Some(v) => v.to_string(),
                        None => args.next().ok_or_else(|| CliError::MissingValue(spelled.clone()))?,
                    };
                    b.set_value(flag, &spelled, value)?;
                }
                Flag::Switch(flag) => b.set_switch(flag, &spelled, inline)?,
            }
        } else if let Some(shorts) = arg.strip_prefix('-').filter(|s| !s.is_empty()) {
            parse_shorts(shorts, &mut args, &mut b)?;
        } else {
            return Err(CliError::UnexpectedArgument(arg));
        }
    }

    b.finish()
}

/// Parse a cluster of short flags such as `-dk`, `-vv`, `-p styles/*.css`
/// or `-pstyles/*.css`.
fn parse_shorts<I>(shorts: &str, rest: &mut I, b: &mut Builder) -> Result<(), CliError>
where
    I: Iterator<Item = String>,
{
    for (i, c) in shorts.char_indices() {
        let spelled = format!("-{c}");
        let flag = Flag::from_short(c).ok_or_else(|| CliError::UnknownFlag(spelled.clone()))?;

        match flag {
            Flag::Value(flag) => {
                let attached = &shorts[i + c.len_utf8()..];
                let attached = attached.strip_prefix('=').unwrap_or(attached);
                let value = if attached.is_empty() {
                    rest.next().ok_or_else(|| CliError::MissingValue(spelled.clone()))?
                } else {
                    attached.to_string()
                };
                return b.set_value(flag, &spelled, value);
            }
            Flag::Switch(flag) => b.set_switch(flag, &spelled, None)?,
        }
    }
    Ok(())
}

fn parse_threshold(flag: &str, value: &str) -> Result<f64, CliError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| CliError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}

/// Boolean spellings accepted for `--flag=<bool>`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
