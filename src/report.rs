//! Handles all user-facing output for the harness.
//!
//! One line per fixture (`<path> <verdict>[: <detail>]`) and a final
//! `PASSED <passed>/<total>` line. Verdict codes are colored when the
//! configured [`ColorMode`] allows it.

use std::io;
use std::path::Path;

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::ColorMode;
use crate::judge::Verdict;
use crate::suite::RunSummary;

/// Writes verdict lines to any color-capable sink.
pub struct Reporter<W: WriteColor> {
    out: W,
}

impl Reporter<StandardStream> {
    /// Reporter on stdout, colored according to `mode`.
    pub fn stdout(mode: ColorMode) -> Self {
        let choice = if mode.enabled() {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl Reporter<Buffer> {
    /// Reporter that collects output in memory.
    pub fn buffer(mode: ColorMode) -> Self {
        Self::new(match mode {
            ColorMode::Always => Buffer::ansi(),
            _ => Buffer::no_color(),
        })
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(self.out.as_slice()).into_owned()
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn verdict(&mut self, fixture: &Path, verdict: &Verdict) -> io::Result<()> {
        let color = if verdict.is_accepted() {
            Color::Green
        } else {
            Color::Red
        };
        write!(self.out, "{} ", fixture.display())?;
        self.out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(self.out, "{}", verdict.code())?;
        self.out.reset()?;
        match verdict.detail() {
            Some(detail) => writeln!(self.out, ": {detail}")?,
            None => writeln!(self.out)?,
        }
        self.out.flush()
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out, "{summary}")?;
        self.out.flush()
    }
}
