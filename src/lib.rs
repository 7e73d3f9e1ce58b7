//! Regression harness for a C-- parser.
//!
//! Runs the parser under test on each `.cmm` fixture and judges its stdout
//! against the fixture's companion files. See [`suite::run_suite`] for the
//! library entry point.

pub use crate::errors::{HarnessError, HarnessResult};

pub mod answer;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fixture;
pub mod judge;
pub mod markers;
pub mod report;
pub mod suite;
pub mod tree;
