//! Running the parser under test.
//!
//! The parser is invoked as `<parser> <fixture>` with all three standard
//! streams piped. Output is drained on reader threads so a chatty parser cannot
//! block on a full pipe while the harness waits on its exit. The time limit
//! covers both the exit and the end of its output: a background child that
//! keeps the pipes open past the deadline still counts as a timeout.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::{HarnessError, HarnessResult};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Captured result of a parser run that finished within the time limit.
#[derive(Debug, Clone)]
pub struct Completed {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// How a parser run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Completed),
    /// The time limit expired; the process was killed and its output discarded.
    TimedOut { limit: Duration },
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Drained = (Stream, io::Result<Vec<u8>>);

/// Spawns `parser source` and waits at most `timeout` for it to exit.
pub fn run_parser(parser: &Path, source: &Path, timeout: Duration) -> HarnessResult<RunOutcome> {
    let spawn_err = |source: io::Error| HarnessError::Spawn {
        parser: parser.to_path_buf(),
        source,
    };
    let timed_out = || -> HarnessResult<RunOutcome> {
        debug!(fixture = %source.display(), ?timeout, "parser timed out");
        Ok(RunOutcome::TimedOut { limit: timeout })
    };

    let start = Instant::now();
    let deadline = start + timeout;
    let mut child = Command::new(parser)
        .arg(source)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    // Nothing is fed to the parser; close stdin so reads see EOF.
    drop(child.stdin.take());
    let (tx, rx) = mpsc::channel();
    let mut pending = 0;
    pending += drain(child.stdout.take(), Stream::Stdout, &tx);
    pending += drain(child.stderr.take(), Stream::Stderr, &tx);
    drop(tx);

    let Some(status) = wait_until(&mut child, deadline).map_err(spawn_err)? else {
        if let Err(e) = child.kill() {
            warn!(fixture = %source.display(), error = %e, "failed to kill timed-out parser");
        }
        let _ = child.wait();
        return timed_out();
    };
    let elapsed = start.elapsed();

    let Some((stdout, stderr)) = collect(&rx, pending, deadline).map_err(spawn_err)? else {
        warn!(
            fixture = %source.display(),
            "parser exited but its output stayed open past the time limit"
        );
        return timed_out();
    };
    debug!(
        fixture = %source.display(),
        %status,
        elapsed_ms = elapsed.as_millis() as u64,
        "parser finished"
    );

    Ok(RunOutcome::Completed(Completed {
        status,
        stdout,
        stderr,
        elapsed,
    }))
}

fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Reads `pipe` to its end on a new thread; returns how many results to expect.
fn drain<R: Read + Send + 'static>(pipe: Option<R>, stream: Stream, tx: &Sender<Drained>) -> usize {
    let Some(mut pipe) = pipe else {
        return 0;
    };
    let tx = tx.clone();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        // The receiver is gone once the run has timed out.
        let _ = tx.send((stream, result));
    });
    1
}

/// Waits for every drained stream, giving up at `deadline`.
fn collect(
    rx: &Receiver<Drained>,
    pending: usize,
    deadline: Instant,
) -> io::Result<Option<(String, String)>> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    for _ in 0..pending {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok((Stream::Stdout, result)) => stdout = result?,
            Ok((Stream::Stderr, result)) => stderr = result?,
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(Some((
        String::from_utf8_lossy(&stdout).into_owned(),
        String::from_utf8_lossy(&stderr).into_owned(),
    )))
}
