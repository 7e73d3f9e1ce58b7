//! Shared fixture-tree builder for integration tests.
//!
//! The fake parser echoes the fixture source as its stdout, so each `.cmm`
//! file holds exactly what the "parser" should print. A first line of `#sleep`
//! makes it hang and `#crash` makes it exit with status 2.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const FAKE_PARSER: &str = r##"#!/bin/sh
case "$(head -n 1 "$1")" in
  "#sleep") exec sleep 5 ;;
  "#crash") exit 2 ;;
esac
cat "$1"
"##;

pub struct FixtureTree {
    pub dir: TempDir,
    pub parser: PathBuf,
}

impl FixtureTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let parser = dir.path().join("parser");
        fs::write(&parser, FAKE_PARSER).unwrap();
        fs::set_permissions(&parser, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, parser }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `<rel>.cmm` with the parser's output and its companion files.
    pub fn add(&self, rel: &str, stdout: &str, companions: &[(&str, &str)]) -> PathBuf {
        let source = self.root().join(format!("{rel}.cmm"));
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, stdout).unwrap();
        for (ext, body) in companions {
            fs::write(source.with_extension(ext), body).unwrap();
        }
        source
    }
}
