//! Defines the command-line arguments for the harness.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{ColorMode, GroupSelector, HarnessConfig};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "cmmtest",
    version,
    about = "Runs a C-- parser over .cmm fixtures and judges its output."
)]
pub struct HarnessArgs {
    /// Location of the parser executable.
    #[arg(short, long, default_value = "./parser")]
    pub parser: PathBuf,

    /// Extend group to run; 0 runs every group.
    #[arg(short, long, default_value_t = 0)]
    pub group: u32,

    /// Also run the advance fixtures.
    #[arg(short, long)]
    pub advance: bool,

    /// Wait for confirmation after each failed fixture.
    #[arg(short, long)]
    pub wait: bool,

    /// Time limit for one fixture, in seconds.
    #[arg(short, long, default_value = "1.0", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Accept more reported lines than expected (advance fixtures only).
    #[arg(short, long)]
    pub more: bool,

    /// When to color verdicts.
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Directory containing the base, extend and advance fixture roots.
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Never,
    Always,
    Auto,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Never => ColorMode::Never,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Auto => ColorMode::Auto,
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|e| format!("'{raw}' is not a number: {e}"))?;
    if secs <= 0.0 {
        return Err(format!("timeout must be positive, got {secs}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

impl HarnessArgs {
    pub fn into_config(self) -> HarnessConfig {
        HarnessConfig {
            parser: self.parser,
            root: self.root,
            group: GroupSelector::from_raw(self.group),
            advance: self.advance,
            wait: self.wait,
            timeout: self.timeout,
            lenient: self.more,
            color: self.color.into(),
        }
    }
}
