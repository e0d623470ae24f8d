//! Console Logger
//!
//! `log` backend for the browser. Records go to the devtools console and the
//! most recent ones are kept in a circular buffer so the UI can show them.
//! Every record carries a sequence number; take `next_seq()` before an action
//! and read `recent_since` afterwards to get only what that action logged.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Records kept in the circular buffer
pub const DEFAULT_CAPACITY: usize = 200;

/// One formatted log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub seq: u64,
    pub level: Level,
    pub line: String,
}

/// Fixed-size buffer that drops the oldest entry when full
#[derive(Debug)]
pub struct RingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity: capacity.max(1) }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries numbered `seq` or later at `max_level` or more severe
    pub fn since(&self, seq: u64, max_level: Level) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.seq >= seq && e.level <= max_level)
            .cloned()
            .collect()
    }
}

struct ConsoleLogger {
    level: LevelFilter,
    next_seq: AtomicU64,
    buffer: Mutex<RingBuffer>,
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} [{}] {}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        record.level(),
        record.target(),
        record.args()
    )
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, line: &str) {
    eprintln!("{}", line);
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        write_console(record.level(), &line);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(LogEntry { seq, level: record.level(), line });
        }
    }

    fn flush(&self) {}
}

/// Install the logger as the global `log` backend
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    init_with_capacity(level, DEFAULT_CAPACITY)
}

pub fn init_with_capacity(level: LevelFilter, capacity: usize) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        level,
        next_seq: AtomicU64::new(0),
        buffer: Mutex::new(RingBuffer::new(capacity)),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Sequence number the next record will get
pub fn next_seq() -> u64 {
    LOGGER.get().map(|logger| logger.next_seq.load(Ordering::Relaxed)).unwrap_or(0)
}

/// Buffered records logged since `seq` at `max_level` or more severe
pub fn recent_since(seq: u64, max_level: Level) -> Vec<LogEntry> {
    LOGGER
        .get()
        .and_then(|logger| logger.buffer.lock().ok().map(|buffer| buffer.since(seq, max_level)))
        .unwrap_or_default()
}
