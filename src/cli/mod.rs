//! The harness command-line interface.
//!
//! Parses arguments into a [`HarnessConfig`], runs the suite with the stdout
//! reporter, and handles the interactive pause after failures.

use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use tracing::debug;

use crate::cli::args::HarnessArgs;
use crate::config::HarnessConfig;
use crate::fixture::Fixture;
use crate::judge::Verdict;
use crate::report::Reporter;
use crate::suite::{run_suite, FailureHook, Flow, NoPause, SuiteOutcome};

pub mod args;

pub const PAUSE_PROMPT: &str = "Input [c] to continue, [q] to quit: ";

/// Asks the operator whether to continue after each failed fixture.
///
/// Any answer that does not start with `c` or `C` stops the run, including
/// end of input.
pub struct PromptOnFailure<R, W> {
    input: R,
    output: W,
}

impl PromptOnFailure<io::StdinLock<'static>, io::Stdout> {
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptOnFailure<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self) -> io::Result<String> {
        write!(self.output, "{PAUSE_PROMPT}")?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> FailureHook for PromptOnFailure<R, W> {
    fn on_failure(&mut self, _fixture: &Fixture, _verdict: &Verdict) -> Flow {
        match self.ask() {
            Ok(answer) if answer.starts_with(['c', 'C']) => Flow::Continue,
            Ok(_) => Flow::Abort,
            Err(e) => {
                debug!(error = %e, "pause prompt failed");
                Flow::Abort
            }
        }
    }
}

/// Runs the suite described by `config` against stdout.
pub fn execute(config: &HarnessConfig) -> miette::Result<SuiteOutcome> {
    let mut reporter = Reporter::stdout(config.color);
    let outcome = if config.wait {
        run_suite(config, &mut reporter, &mut PromptOnFailure::terminal())?
    } else {
        run_suite(config, &mut reporter, &mut NoPause)?
    };
    Ok(outcome)
}

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    let config = HarnessArgs::parse().into_config();
    debug!(?config, "starting run");

    if let SuiteOutcome::Aborted(summary) = execute(&config)? {
        debug!(passed = summary.passed, total = summary.total, "aborted");
        process::exit(0);
    }
    Ok(())
}
