use crate::render::{Line, RenderConfig, idle_separator, render_line};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default delay between read attempts in follow mode
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Default silence after which follow mode prints an idle separator
pub const IDLE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Can't open file '{path}' for reading: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read input: {0}")]
    Read(#[source] io::Error),
    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl SourceError {
    /// The output side went away (e.g. `lj log.json | head`)
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, SourceError::Write(err) if err.kind() == io::ErrorKind::BrokenPipe)
    }
}

/// Where records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn open(&self) -> Result<Box<dyn BufRead>, SourceError> {
        match self {
            Source::Stdin => Ok(Box::new(io::stdin().lock())),
            Source::File(path) => {
                let file = File::open(path).map_err(|source| SourceError::Open {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }

    /// Whether reads hit end of input instead of blocking for more data
    pub fn is_regular_file(&self) -> bool {
        match self {
            Source::Stdin => false,
            Source::File(path) => std::fs::metadata(path).is_ok_and(|meta| meta.is_file()),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Stdin => write!(f, "<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Follow mode timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOptions {
    pub poll_interval: Duration,
    pub idle_interval: Duration,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            idle_interval: IDLE_INTERVAL,
        }
    }
}

/// Counters reported when a stream ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines_read: usize,
    pub records_rendered: usize,
}

fn write_lines<W: Write>(out: &mut W, lines: &[Line], colorize: bool) -> Result<(), SourceError> {
    for line in lines {
        writeln!(out, "{}", line.paint(colorize)).map_err(SourceError::Write)?;
    }
    out.flush().map_err(SourceError::Write)
}

/// Reads the source to the end, rendering every line
///
/// Lines are trimmed and blank lines are skipped.
pub fn read_all<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    config: &RenderConfig,
    colorize: bool,
) -> Result<StreamStats, SourceError> {
    let mut stats = StreamStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(SourceError::Read)? == 0 {
            break;
        }

        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        stats.lines_read += 1;
        if let Some(lines) = render_line(line, config) {
            write_lines(out, &lines, colorize)?;
            stats.records_rendered += 1;
        }
    }

    Ok(stats)
}

/// Reads a growing source until `stop` is set
///
/// Reaching the end of the input is never final: the loop sleeps for
/// `poll_interval` and tries again. Data without a trailing newline is kept
/// until the rest of the line arrives. When a record renders after more than
/// `idle_interval` without output, an idle separator is printed first.
pub fn follow<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    config: &RenderConfig,
    colorize: bool,
    options: &FollowOptions,
    stop: &AtomicBool,
) -> Result<StreamStats, SourceError> {
    let mut stats = StreamStats::default();
    let mut pending = Vec::new();
    let mut last_render = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        match reader.read_until(b'\n', &mut pending) {
            Ok(_) if pending.ends_with(b"\n") => {}
            Ok(_) => {
                thread::sleep(options.poll_interval);
                continue;
            }
            Err(err) => {
                tracing::debug!(error = %err, "read failed, retrying");
                thread::sleep(options.poll_interval);
                continue;
            }
        }

        let raw = String::from_utf8_lossy(&pending).into_owned();
        pending.clear();

        let line = raw.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        stats.lines_read += 1;
        let Some(lines) = render_line(line, config) else {
            continue;
        };

        let idle = last_render.elapsed();
        if idle >= options.idle_interval {
            write_lines(out, &[idle_separator(idle)], colorize)?;
        }

        write_lines(out, &lines, colorize)?;
        stats.records_rendered += 1;
        last_render = Instant::now();
    }

    tracing::info!(
        lines = stats.lines_read,
        records = stats.records_rendered,
        "follow stopped"
    );
    Ok(stats)
}
