//! Immutable run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Subdirectories of the extend root whose name starts with this are
/// exclusion groups: `not3` runs for every group except 3.
pub const EXCLUSION_PREFIX: &str = "not";

pub const BASE_DIR: &str = "base";
pub const EXTEND_DIR: &str = "extend";
pub const ADVANCE_DIR: &str = "advance";

/// When to emit ANSI colors on the verdict stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Never,
    Always,
    /// Only when stdout is a terminal.
    #[default]
    Auto,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Never => false,
            ColorMode::Always => true,
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}

/// Which extend-root groups take part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupSelector {
    /// Every plain group directory; exclusion directories are skipped.
    #[default]
    All,
    /// Group `n`'s own directory plus every exclusion directory except `not<n>`.
    Only(u32),
}

impl GroupSelector {
    /// Resolves the raw command-line selector, where `0` means all groups.
    pub fn from_raw(group: u32) -> Self {
        match group {
            0 => GroupSelector::All,
            n => GroupSelector::Only(n),
        }
    }

    /// Whether the extend subdirectory `dir` is scanned.
    pub fn admits(self, dir: &ExtendDir<'_>) -> bool {
        match (self, dir) {
            (GroupSelector::All, ExtendDir::Group(_)) => true,
            (GroupSelector::All, ExtendDir::ExcludeGroup(_)) => false,
            (GroupSelector::Only(n), ExtendDir::Group(group)) => *group == n.to_string(),
            (GroupSelector::Only(n), ExtendDir::ExcludeGroup(group)) => *group != n.to_string(),
        }
    }
}

/// A subdirectory of the extend root, classified by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendDir<'a> {
    /// `<k>`: fixtures for group `k` only.
    Group(&'a str),
    /// `not<k>`: fixtures for every group except `k`.
    ExcludeGroup(&'a str),
}

impl<'a> ExtendDir<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name.strip_prefix(EXCLUSION_PREFIX) {
            Some(group) => ExtendDir::ExcludeGroup(group),
            None => ExtendDir::Group(name),
        }
    }
}

/// Everything a run needs, fixed before the first fixture executes.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Parser executable under test.
    pub parser: PathBuf,
    /// Directory holding the `base`, `extend` and `advance` fixture roots.
    pub root: PathBuf,
    pub group: GroupSelector,
    /// Also run the advance fixtures.
    pub advance: bool,
    /// Ask the operator before continuing after a failure.
    pub wait: bool,
    pub timeout: Duration,
    /// Advance diagnostic fixtures accept extra reported lines.
    pub lenient: bool,
    pub color: ColorMode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            parser: PathBuf::from("./parser"),
            root: PathBuf::from("."),
            group: GroupSelector::All,
            advance: false,
            wait: false,
            timeout: Duration::from_secs(1),
            lenient: false,
            color: ColorMode::Auto,
        }
    }
}

impl HarnessConfig {
    pub fn base_dir(&self) -> PathBuf {
        self.root.join(BASE_DIR)
    }

    pub fn extend_dir(&self) -> PathBuf {
        self.root.join(EXTEND_DIR)
    }

    pub fn advance_dir(&self) -> PathBuf {
        self.root.join(ADVANCE_DIR)
    }

    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_parser(mut self, parser: impl AsRef<Path>) -> Self {
        self.parser = parser.as_ref().to_path_buf();
        self
    }
}
