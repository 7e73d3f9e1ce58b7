//! Suite driver: walks the fixture roots and tallies verdicts.
//!
//! Roots are visited in a fixed order: `base`, then each admitted `extend`
//! group, then `advance` when enabled. Fixtures run one at a time.

use std::fmt;
use std::path::Path;

use termcolor::WriteColor;
use tracing::{debug, info};

use crate::config::{ExtendDir, HarnessConfig};
use crate::errors::HarnessResult;
use crate::fixture::{self, Fixture};
use crate::judge::{run_fixture, Mode, Verdict};
use crate::report::Reporter;

/// Passed and total fixture counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
}

impl RunSummary {
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        if verdict.is_accepted() {
            self.passed += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PASSED {}/{}", self.passed, self.total)
    }
}

/// Whether the driver keeps going after a failed fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Called after every failed fixture.
pub trait FailureHook {
    fn on_failure(&mut self, fixture: &Fixture, verdict: &Verdict) -> Flow;
}

/// Never pauses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl FailureHook for NoPause {
    fn on_failure(&mut self, _fixture: &Fixture, _verdict: &Verdict) -> Flow {
        Flow::Continue
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteOutcome {
    Completed(RunSummary),
    /// The failure hook asked to stop; the summary covers fixtures run so far.
    Aborted(RunSummary),
}

impl SuiteOutcome {
    pub fn summary(&self) -> RunSummary {
        match *self {
            SuiteOutcome::Completed(s) | SuiteOutcome::Aborted(s) => s,
        }
    }
}

struct Driver<'a, W: WriteColor, H: FailureHook + ?Sized> {
    config: &'a HarnessConfig,
    reporter: &'a mut Reporter<W>,
    hook: &'a mut H,
    summary: RunSummary,
}

impl<W: WriteColor, H: FailureHook + ?Sized> Driver<'_, W, H> {
    fn run_root(&mut self, root: &Path, mode: Mode) -> HarnessResult<Flow> {
        debug!(root = %root.display(), ?mode, "scanning fixture root");
        for fixture in fixture::discover(root)? {
            let verdict = run_fixture(self.config, &fixture, mode)?;
            self.reporter.verdict(fixture.source(), &verdict)?;
            self.summary.record(&verdict);

            if !verdict.is_accepted() && self.hook.on_failure(&fixture, &verdict) == Flow::Abort {
                info!(fixture = %fixture.source().display(), "run aborted by operator");
                return Ok(Flow::Abort);
            }
        }
        Ok(Flow::Continue)
    }

    fn run_all(&mut self) -> HarnessResult<Flow> {
        let config = self.config;
        if self.run_root(&config.base_dir(), Mode::Simple)? == Flow::Abort {
            return Ok(Flow::Abort);
        }

        let extend = config.extend_dir();
        for name in fixture::subdirectories(&extend)? {
            if !config.group.admits(&ExtendDir::parse(&name)) {
                debug!(group = %name, "group not selected, skipping");
                continue;
            }
            if self.run_root(&extend.join(&name), Mode::Simple)? == Flow::Abort {
                return Ok(Flow::Abort);
            }
        }

        if config.advance {
            return self.run_root(&config.advance_dir(), Mode::Advance);
        }
        Ok(Flow::Continue)
    }
}

/// Runs every selected fixture, reporting each verdict as it is decided.
///
/// The `PASSED` line is written only when the run completes.
pub fn run_suite<W: WriteColor>(
    config: &HarnessConfig,
    reporter: &mut Reporter<W>,
    hook: &mut dyn FailureHook,
) -> HarnessResult<SuiteOutcome> {
    let mut driver = Driver {
        config,
        reporter,
        hook,
        summary: RunSummary::default(),
    };

    let flow = driver.run_all()?;
    let summary = driver.summary;
    match flow {
        Flow::Abort => Ok(SuiteOutcome::Aborted(summary)),
        Flow::Continue => {
            driver.reporter.summary(&summary)?;
            Ok(SuiteOutcome::Completed(summary))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::Mismatch;

    #[test]
    fn summary_counts() {
        let mut s = RunSummary::default();
        s.record(&Verdict::Accepted);
        s.record(&Verdict::WrongAnswer(Mismatch::Whitespace));
        s.record(&Verdict::RuntimeError { code: Some(1) });
        assert_eq!(s, RunSummary { total: 3, passed: 1 });
        assert_eq!(s.failed(), 2);
        assert_eq!(s.to_string(), "PASSED 1/3");
    }

    #[test]
    fn empty_tree_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::default().with_root(dir.path());
        let mut reporter = Reporter::buffer(crate::config::ColorMode::Never);
        let outcome = run_suite(&config, &mut reporter, &mut NoPause).unwrap();
        assert_eq!(outcome, SuiteOutcome::Completed(RunSummary::default()));
        assert_eq!(reporter.contents(), "PASSED 0/0\n");
    }
}
