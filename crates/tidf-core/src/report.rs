//! User-facing console lines, behind a small leveled interface.
//!
//! The fetcher only talks to [`Reporter`]; colours live in
//! [`ConsoleReporter`]. Detailed diagnostics go to `tracing` instead.

use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Progress,
    Success,
    Warn,
    Error,
}

/// Sink for the console lines of a run. Shared across fetch tasks.
pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, msg: &str);

    fn info(&self, msg: &str) {
        self.report(Level::Info, msg);
    }

    fn progress(&self, msg: &str) {
        self.report(Level::Progress, msg);
    }

    fn success(&self, msg: &str) {
        self.report(Level::Success, msg);
    }

    fn warn(&self, msg: &str) {
        self.report(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.report(Level::Error, msg);
    }
}

/// Writes one line per report to stdout, ANSI-coloured when enabled.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour only when stdout is a terminal and the user did not opt out.
    pub fn detect(no_color: bool) -> Self {
        Self::new(!no_color && io::stdout().is_terminal())
    }

    fn color_for(level: Level) -> Option<&'static str> {
        match level {
            Level::Info => None,
            Level::Progress | Level::Warn => Some(YELLOW),
            Level::Success => Some(GREEN),
            Level::Error => Some(RED),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, msg: &str) {
        // Lock per line so lines from concurrent fetches never interleave mid-line.
        let mut out = io::stdout().lock();
        let _ = match Self::color_for(level).filter(|_| self.color) {
            Some(c) => writeln!(out, "{}{}{}", c, msg, RESET),
            None => writeln!(out, "{}", msg),
        };
    }
}

/// Keeps every line in memory. For tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, msg.to_string()));
    }
}
