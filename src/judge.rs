//! Per-fixture verdicts.
//!
//! A fixture runs once. A timeout or a nonzero exit fails it outright; a clean
//! exit is judged against its companion files:
//!
//! - **simple** fixtures use the `.txt` answer set when it constrains
//!   anything, otherwise the literal `.out` stdout;
//! - **advance** fixtures compare diagnostic line sets when the `.output` file
//!   lists diagnostics, otherwise the normalized parse-tree dump.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::answer::AnswerSet;
use crate::compare::{first_mismatch, LineMismatch};
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, HarnessResult};
use crate::exec::{run_parser, RunOutcome};
use crate::fixture::{Fixture, ADVANCE_EXT, ANSWER_EXT, STDOUT_EXT};
use crate::{markers, tree};

/// Which companion files decide a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Simple,
    Advance,
}

/// The outcome of one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// AC
    Accepted,
    /// WA
    WrongAnswer(Mismatch),
    /// RE: the parser exited with a nonzero status. `None` when killed by a signal.
    RuntimeError { code: Option<i32> },
    /// TLE
    TimeLimitExceeded { limit: Duration },
}

/// What a wrong answer got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Diagnostics matched none of the answer rows; `expected` is the first row.
    Answer {
        got: Vec<String>,
        expected: Vec<String>,
    },
    /// Diagnostic line numbers differ from the advance expectation.
    Lines {
        got: BTreeSet<u64>,
        expected: BTreeSet<u64>,
    },
    /// Output differs from the expected text at a specific line.
    Text(LineMismatch),
    /// Output differs only in whitespace inside lines.
    Whitespace,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The short verdict code printed after the fixture path.
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer(_) => "WA",
            Verdict::RuntimeError { .. } => "RE",
            Verdict::TimeLimitExceeded { .. } => "TLE",
        }
    }

    /// Explanation printed after the code, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Verdict::Accepted => None,
            Verdict::WrongAnswer(m) => Some(m.to_string()),
            Verdict::RuntimeError { code: Some(code) } => Some(format!("exit code {code}")),
            Verdict::RuntimeError { code: None } => Some("killed by signal".to_string()),
            Verdict::TimeLimitExceeded { limit } => {
                Some(format!("exceeded {}s", limit.as_secs_f64()))
            }
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Answer { got, expected } => write!(f, "got {got:?}, expect {expected:?}"),
            Mismatch::Lines { got, expected } => {
                let got: Vec<_> = got.iter().collect();
                let expected: Vec<_> = expected.iter().collect();
                write!(f, "got {got:?}, expect {expected:?}")
            }
            Mismatch::Text(m) => fmt::Display::fmt(m, f),
            Mismatch::Whitespace => f.write_str("output differs in whitespace"),
        }
    }
}

fn verdict_from(mismatch: Option<Mismatch>) -> Verdict {
    mismatch.map_or(Verdict::Accepted, Verdict::WrongAnswer)
}

/// Judges a simple fixture's stdout.
pub fn judge_simple(fixture: &Fixture, stdout: &str) -> HarnessResult<Verdict> {
    let answers = AnswerSet::parse(&fixture.read_companion(ANSWER_EXT)?);

    if !answers.is_unconstrained() {
        let got = markers::distinguishing(stdout);
        if answers.accepts(&got) {
            return Ok(Verdict::Accepted);
        }
        let expected = answers.first().cloned().unwrap_or_default();
        return Ok(Verdict::WrongAnswer(Mismatch::Answer { got, expected }));
    }

    let expected = fixture.read_companion(STDOUT_EXT)?;
    let (got, expected) = (stdout.trim(), expected.trim());
    if got == expected {
        return Ok(Verdict::Accepted);
    }
    let got_lines: Vec<&str> = got.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();
    let mismatch = first_mismatch(&got_lines, &expected_lines)
        .map_or(Mismatch::Whitespace, Mismatch::Text);
    Ok(Verdict::WrongAnswer(mismatch))
}

/// Judges an advance fixture's stdout.
///
/// With `lenient`, a diagnostic expectation only requires every expected line
/// to be reported; extra reported lines are accepted.
pub fn judge_advance(fixture: &Fixture, stdout: &str, lenient: bool) -> HarnessResult<Verdict> {
    let dump = fixture.read_companion(ADVANCE_EXT)?;

    let expected = markers::line_set(&dump);
    if !expected.is_empty() {
        let got = markers::line_set(stdout);
        let ok = if lenient {
            expected.is_subset(&got)
        } else {
            expected == got
        };
        return Ok(if ok {
            Verdict::Accepted
        } else {
            Verdict::WrongAnswer(Mismatch::Lines { got, expected })
        });
    }

    let expected = tree::normalize(&dump)
        .map_err(|e| HarnessError::fixture(fixture.companion(ADVANCE_EXT), e.to_string()))?;
    let got: Vec<&str> = stdout.trim().lines().collect();
    Ok(verdict_from(
        first_mismatch(&got, &expected).map(Mismatch::Text),
    ))
}

/// Runs the parser on one fixture and judges the result.
pub fn run_fixture(config: &HarnessConfig, fixture: &Fixture, mode: Mode) -> HarnessResult<Verdict> {
    let done = match run_parser(&config.parser, fixture.source(), config.timeout)? {
        RunOutcome::TimedOut { limit } => return Ok(Verdict::TimeLimitExceeded { limit }),
        RunOutcome::Completed(done) => done,
    };
    if !done.status.success() {
        return Ok(Verdict::RuntimeError {
            code: done.status.code(),
        });
    }

    match mode {
        Mode::Simple => judge_simple(fixture, &done.stdout),
        Mode::Advance => judge_advance(fixture, &done.stdout, config.lenient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, companions: &[(&str, &str)]) -> Fixture {
        let source = dir.path().join("t.cmm");
        fs::write(&source, "int main() {}\n").unwrap();
        for (ext, body) in companions {
            fs::write(source.with_extension(ext), body).unwrap();
        }
        Fixture::new(source)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn simple_answer_accepts_matching_row() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("txt", "A1\n")]);
        let v = judge_simple(&f, "Error type A at Line 1: Mysterious character \"~\".\n").unwrap();
        assert_eq!(v, Verdict::Accepted);
    }

    #[test]
    fn simple_answer_reports_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("txt", "A1\n")]);
        let v = judge_simple(&f, "Error type B at Line 1: syntax error\n").unwrap();
        assert_eq!(
            v,
            Verdict::WrongAnswer(Mismatch::Answer {
                got: strings(&["B1"]),
                expected: strings(&["A1"]),
            })
        );
        assert_eq!(v.detail().unwrap(), r#"got ["B1"], expect ["A1"]"#);
    }

    #[test]
    fn empty_answer_falls_back_to_literal_output() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("txt", ""), ("out", "Program (1)\n  ExtDefList (1)\n\n")]);
        assert!(judge_simple(&f, "\nProgram (1)\n  ExtDefList (1)").unwrap().is_accepted());

        let v = judge_simple(&f, "Program (1)\n  ExtDef (1)").unwrap();
        let Verdict::WrongAnswer(Mismatch::Text(m)) = v else {
            panic!("expected a text mismatch, got {v:?}");
        };
        assert_eq!(m.line, 2);
    }

    #[test]
    fn literal_output_is_compared_whole() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("txt", ""), ("out", "a\n  b")]);
        let v = judge_simple(&f, "a\nb").unwrap();
        assert_eq!(v, Verdict::WrongAnswer(Mismatch::Whitespace));
    }

    #[test]
    fn missing_answer_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[]);
        assert!(judge_simple(&f, "").is_err());
    }

    #[test]
    fn advance_diagnostics_compare_line_sets() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("output", "Error type B at Line 4: Missing \";\".\n")]);
        assert!(judge_advance(&f, "Error type A at Line 4: bad\n", false).unwrap().is_accepted());

        let v = judge_advance(&f, "Error type B at Line 4\nError type B at Line 6\n", false).unwrap();
        assert_eq!(v.detail().unwrap(), "got [4, 6], expect [4]");
    }

    #[test]
    fn lenient_accepts_extra_lines_only() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("output", "Error type B at Line 4\nError type B at Line 9\n")]);
        let extra = "Error type B at Line 4\nError type B at Line 6\nError type B at Line 9\n";
        assert!(judge_advance(&f, extra, true).unwrap().is_accepted());
        assert!(!judge_advance(&f, extra, false).unwrap().is_accepted());
        assert!(!judge_advance(&f, "Error type B at Line 4\n", true).unwrap().is_accepted());
    }

    #[test]
    fn advance_dump_tolerates_float_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let expected = "Program (1)\n  ExtDefList (1)\n    Exp (1)\n      FLOAT: 2\n  ExtDefList\n";
        let f = fixture(&dir, &[("output", expected)]);
        let actual = "Program (1)\n  ExtDefList (1)\n    Exp (1)\n      FLOAT: 2.000000\n";
        assert!(judge_advance(&f, actual, false).unwrap().is_accepted());
    }

    #[test]
    fn advance_dump_reports_first_difference() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("output", "Program (1)\n  Exp (1)\n    RELOP: <\n")]);
        let v = judge_advance(&f, "Program (1)\n  Exp (1)\n    RELOP\n    INT: 3", false).unwrap();
        assert_eq!(v.detail().unwrap(), "err @ Line4, got INT: 3, expect ");
    }

    #[test]
    fn unreadable_float_in_dump_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let f = fixture(&dir, &[("output", "Exp (1)\n  FLOAT: two\n")]);
        let err = judge_advance(&f, "", false).unwrap_err();
        assert!(matches!(err, HarnessError::Fixture { .. }));
    }

    #[test]
    fn verdict_codes() {
        assert_eq!(Verdict::Accepted.code(), "AC");
        assert_eq!(Verdict::RuntimeError { code: Some(1) }.code(), "RE");
        let tle = Verdict::TimeLimitExceeded {
            limit: Duration::from_millis(1500),
        };
        assert_eq!(tle.code(), "TLE");
        assert_eq!(tle.detail().unwrap(), "exceeded 1.5s");
    }
}
