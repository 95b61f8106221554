//! Minimal stderr logger for the binaries.
//!
//! The level comes from `TABKEYS_LOG` (`off`, `error`, `warn`, `info`,
//! `debug`, `trace`); anything else falls back to `warn`.

use log::{LevelFilter, Log, Metadata, Record};

pub const LOG_ENV: &str = "TABKEYS_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn level_from_str(value: &str) -> LevelFilter {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "0" => LevelFilter::Off,
        "error" | "1" => LevelFilter::Error,
        "info" | "3" => LevelFilter::Info,
        "debug" | "4" => LevelFilter::Debug,
        "trace" | "5" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

pub fn level_from_env() -> LevelFilter {
    std::env::var(LOG_ENV)
        .map(|v| level_from_str(&v))
        .unwrap_or(LevelFilter::Warn)
}

/// Installs the logger. Calling it twice keeps the first installation.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_from_env());
    }
}
