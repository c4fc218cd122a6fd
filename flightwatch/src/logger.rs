//! Scored flight log.
//!
//! The [`FlightLogger`] collects the pilot-visible log of a flight: plain
//! messages, stage lines, and faults, each tagged with the sample timestamp
//! that produced it. It also owns the flight rating: a score starting at
//! 100.0 that fault entries decrement and a no-go condition freezes at the
//! −1 sentinel.
//!
//! Output is fanned out to [`LogSink`] implementations. [`TracingSink`]
//! bridges to the `tracing` infrastructure; [`MemorySink`] keeps a bounded
//! in-memory ring for later report assembly and tolerates being read while
//! the pipeline appends.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::stage::Stage;

/// Sentinel score reported after a no-go condition.
pub const NO_GO_SCORE: f64 = -1.0;

/// Score at the start of a flight.
pub const INITIAL_SCORE: f64 = 100.0;

/// Default capacity of the [`MemorySink`] ring.
pub const DEFAULT_MEMORY_LINES: usize = 10_000;

/// One line of the flight log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    /// Sample timestamp (seconds of simulator stream time).
    pub timestamp: f64,
    /// Rendered text.
    pub text: String,
    /// Whether this line records a fault or no-go.
    pub faulty: bool,
}

/// Destination for flight log output.
///
/// Sinks receive every entry the logger produces. Implementations must be
/// cheap; they run on the worker that delivers state samples.
pub trait LogSink: Send {
    /// A plain, pilot-visible message.
    fn message(&self, timestamp: f64, text: &str);

    /// Diagnostic output, not part of the pilot-visible log.
    fn debug(&self, timestamp: f64, text: &str);

    /// A stage transition.
    fn stage(&self, timestamp: f64, stage: Stage);

    /// A fault with its score decrement.
    fn fault(&self, timestamp: f64, reason: &str, score_delta: f64);

    /// A no-go condition.
    fn no_go(&self, timestamp: f64, reason: &str);
}

/// Format a sample timestamp as `HH:MM:SS` UTC.
fn format_timestamp(timestamp: f64) -> String {
    match chrono::DateTime::from_timestamp(timestamp as i64, 0) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => format!("{timestamp:.0}"),
    }
}

/// Sink that forwards flight log entries to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn message(&self, timestamp: f64, text: &str) {
        tracing::info!(time = %format_timestamp(timestamp), "{text}");
    }

    fn debug(&self, timestamp: f64, text: &str) {
        tracing::debug!(time = %format_timestamp(timestamp), "{text}");
    }

    fn stage(&self, timestamp: f64, stage: Stage) {
        tracing::info!(time = %format_timestamp(timestamp), stage = %stage, "Stage change");
    }

    fn fault(&self, timestamp: f64, reason: &str, score_delta: f64) {
        tracing::warn!(
            time = %format_timestamp(timestamp),
            score_delta,
            "Fault: {reason}"
        );
    }

    fn no_go(&self, timestamp: f64, reason: &str) {
        tracing::error!(time = %format_timestamp(timestamp), "NO GO: {reason}");
    }
}

/// Bounded in-memory ring of log lines.
///
/// Cloning shares the underlying ring, so a report assembler can hold a
/// handle while the pipeline keeps appending and take a snapshot when the
/// flight ends.
#[derive(Debug, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            capacity,
        }
    }

    /// Copy of the lines currently in the ring.
    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lines.lock().iter().cloned().collect()
    }

    fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LINES)
    }
}

impl LogSink for MemorySink {
    fn message(&self, timestamp: f64, text: &str) {
        self.push(LogLine {
            timestamp,
            text: text.to_string(),
            faulty: false,
        });
    }

    fn debug(&self, _timestamp: f64, _text: &str) {
        // Diagnostic output is not part of the report.
    }

    fn stage(&self, timestamp: f64, stage: Stage) {
        self.push(LogLine {
            timestamp,
            text: format!("--- {stage} ---"),
            faulty: false,
        });
    }

    fn fault(&self, timestamp: f64, reason: &str, score_delta: f64) {
        self.push(LogLine {
            timestamp,
            text: format!("{reason} (-{score_delta:.0})"),
            faulty: true,
        });
    }

    fn no_go(&self, timestamp: f64, reason: &str) {
        self.push(LogLine {
            timestamp,
            text: format!("{reason} (NO GO)"),
            faulty: true,
        });
    }
}

/// The scored flight log.
///
/// Owned by the session and written only by the checker pipeline; see the
/// crate-level concurrency notes. Lines are kept here for the session and
/// fanned out to the configured sinks as they are produced.
pub struct FlightLogger {
    score: f64,
    no_go: bool,
    lines: Vec<LogLine>,
    sinks: Vec<Box<dyn LogSink>>,
}

impl FlightLogger {
    pub fn new() -> Self {
        Self {
            score: INITIAL_SCORE,
            no_go: false,
            lines: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Attach a sink that receives every subsequent entry.
    pub fn add_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sinks.push(sink);
    }

    /// Current flight rating.
    ///
    /// Returns the [`NO_GO_SCORE`] sentinel once a no-go has been recorded.
    pub fn score(&self) -> f64 {
        if self.no_go {
            NO_GO_SCORE
        } else {
            self.score
        }
    }

    /// Whether a no-go condition has been recorded.
    pub fn is_no_go(&self) -> bool {
        self.no_go
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Restore the logger for a new flight: score back to 100, no-go
    /// cleared, lines dropped. Sinks stay attached.
    pub fn reset(&mut self) {
        self.score = INITIAL_SCORE;
        self.no_go = false;
        self.lines.clear();
    }

    /// Record a plain message.
    pub fn message(&mut self, timestamp: f64, text: &str) {
        self.lines.push(LogLine {
            timestamp,
            text: text.to_string(),
            faulty: false,
        });
        for sink in &self.sinks {
            sink.message(timestamp, text);
        }
    }

    /// Record diagnostic output; not added to the pilot-visible lines.
    pub fn debug(&mut self, timestamp: f64, text: &str) {
        for sink in &self.sinks {
            sink.debug(timestamp, text);
        }
    }

    /// Record a stage transition line.
    pub fn stage(&mut self, timestamp: f64, stage: Stage) {
        self.lines.push(LogLine {
            timestamp,
            text: format!("--- {stage} ---"),
            faulty: false,
        });
        for sink in &self.sinks {
            sink.stage(timestamp, stage);
        }
    }

    /// Record a fault and decrement the score.
    ///
    /// Decrements are ignored while the score is frozen by a no-go, but the
    /// line is still logged.
    pub fn fault(&mut self, timestamp: f64, reason: &str, score_delta: f64) {
        if !self.no_go {
            self.score -= score_delta;
        }
        self.lines.push(LogLine {
            timestamp,
            text: format!("{reason} (-{score_delta:.0})"),
            faulty: true,
        });
        for sink in &self.sinks {
            sink.fault(timestamp, reason, score_delta);
        }
    }

    /// Record a no-go condition, freezing the score at the sentinel.
    pub fn no_go(&mut self, timestamp: f64, reason: &str) {
        self.no_go = true;
        self.lines.push(LogLine {
            timestamp,
            text: format!("{reason} (NO GO)"),
            faulty: true,
        });
        for sink in &self.sinks {
            sink.no_go(timestamp, reason);
        }
    }
}

impl Default for FlightLogger {
    fn default() -> Self {
        Self::new()
    }
}
