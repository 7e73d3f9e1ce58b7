//! Fatal harness errors.
//!
//! A fixture that the parser fails (WA, RE, TLE) is not an error: it is a
//! [`Verdict`](crate::judge::Verdict). The variants here cover conditions the
//! harness cannot recover from, such as an unreadable companion file or a
//! parser executable that cannot be started. They abort the whole run.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the harness.
pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// A fixture or companion file could not be read.
    #[error("failed to read '{}'", path.display())]
    #[diagnostic(
        code(cmmtest::io),
        help("every .cmm fixture needs its companion .txt/.out (simple) or .output (advance) file")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The parser executable could not be started or waited on.
    #[error("failed to run parser '{}'", parser.display())]
    #[diagnostic(code(cmmtest::spawn), help("check the --parser path and its permissions"))]
    Spawn {
        parser: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An expected-output fixture holds content the harness cannot interpret.
    #[error("malformed fixture '{}': {message}", path.display())]
    #[diagnostic(code(cmmtest::fixture))]
    Fixture { path: PathBuf, message: String },

    /// Walking a fixture directory failed.
    #[error("failed to walk fixture directory '{}'", root.display())]
    #[diagnostic(code(cmmtest::walk))]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Writing to the report stream failed.
    #[error("failed to write report output")]
    #[diagnostic(code(cmmtest::report))]
    Report(#[from] io::Error),
}

impl HarnessError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn fixture(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Fixture {
            path: path.into(),
            message: message.into(),
        }
    }
}
