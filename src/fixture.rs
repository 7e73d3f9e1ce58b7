//! Fixture naming and discovery.
//!
//! A fixture is a `.cmm` source plus companion files sharing its base name:
//! `.txt` (answer set), `.out` (literal stdout) and `.output` (advance dump or
//! diagnostic list).

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::errors::{HarnessError, HarnessResult};

pub const SOURCE_EXT: &str = "cmm";
pub const ANSWER_EXT: &str = "txt";
pub const STDOUT_EXT: &str = "out";
pub const ADVANCE_EXT: &str = "output";

/// A `.cmm` test source and its companion files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    source: PathBuf,
}

impl Fixture {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path of the companion file with the given extension.
    pub fn companion(&self, ext: &str) -> PathBuf {
        self.source.with_extension(ext)
    }

    /// Reads a companion file; a missing companion is fatal.
    pub fn read_companion(&self, ext: &str) -> HarnessResult<String> {
        let path = self.companion(ext);
        fs::read_to_string(&path).map_err(|e| HarnessError::read(path, e))
    }
}

/// Returns true if the given path has a `.cmm` extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXT)
}

// Files before subdirectories, each group by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Recursively collects the fixtures under `root`.
///
/// Each directory's own sources come first, in name order, followed by its
/// subdirectories. Symbolic links are followed. A root that does not exist
/// yields no fixtures.
pub fn discover(root: &Path) -> HarnessResult<Vec<Fixture>> {
    if !root.is_dir() {
        debug!(root = %root.display(), "fixture root missing, skipping");
        return Ok(Vec::new());
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by(files_first) {
        let entry = entry.map_err(|source| HarnessError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            fixtures.push(Fixture::new(entry.into_path()));
        }
    }
    Ok(fixtures)
}

/// Immediate subdirectory names of `root`, sorted.
pub fn subdirectories(root: &Path) -> HarnessResult<Vec<String>> {
    if !root.is_dir() {
        debug!(root = %root.display(), "extend root missing, skipping");
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1) {
        let entry = entry.map_err(|source| HarnessError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn companion_swaps_extension() {
        let f = Fixture::new("base/A_1.cmm");
        assert_eq!(f.companion(ANSWER_EXT), PathBuf::from("base/A_1.txt"));
        assert_eq!(f.companion(ADVANCE_EXT), PathBuf::from("base/A_1.output"));
    }

    #[test]
    fn missing_companion_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let f = Fixture::new(dir.path().join("x.cmm"));
        let err = f.read_companion(STDOUT_EXT).unwrap_err();
        assert!(matches!(err, HarnessError::Read { .. }));
    }

    #[test]
    fn discovery_orders_files_before_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.cmm"));
        touch(&root.join("a.cmm"));
        touch(&root.join("a.txt"));
        touch(&root.join("sub/c.cmm"));
        touch(&root.join("z.cmm"));

        let names: Vec<PathBuf> = discover(root)
            .unwrap()
            .iter()
            .map(|f| f.source().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![
            PathBuf::from("a.cmm"),
            PathBuf::from("b.cmm"),
            PathBuf::from("z.cmm"),
            PathBuf::from("sub/c.cmm"),
        ]);
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("nope")).unwrap().is_empty());
        assert!(subdirectories(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sources_and_groups_are_found() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared");
        touch(&shared.join("real.cmm"));
        touch(&shared.join("group/g.cmm"));

        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        symlink(shared.join("real.cmm"), root.join("linked.cmm")).unwrap();
        symlink(shared.join("group"), root.join("3")).unwrap();

        let names: Vec<PathBuf> = discover(&root)
            .unwrap()
            .iter()
            .map(|f| f.source().strip_prefix(&root).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("linked.cmm"), PathBuf::from("3/g.cmm")]);
        assert_eq!(subdirectories(&root).unwrap(), vec!["3"]);
    }

    #[test]
    fn subdirectories_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2")).unwrap();
        fs::create_dir(dir.path().join("1")).unwrap();
        touch(&dir.path().join("readme"));
        assert_eq!(subdirectories(dir.path()).unwrap(), vec!["1", "2"]);
    }
}
