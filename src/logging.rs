//! `log` backend writing to the Workers console
//!
//! Installed once per isolate from the `start` event. Until then (and in
//! native tests) `log` macros are no-ops.

use log::{Level, LevelFilter, Log, Metadata, Record};
use worker::{console_error, console_log, console_warn};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => console_error!("[{}] {}", record.target(), record.args()),
            Level::Warn => console_warn!("[{}] {}", record.target(), record.args()),
            level => console_log!("{level} [{}] {}", record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

/// `LOG_LEVEL` value to a filter; unrecognised values mean `info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger; later calls only adjust the level
pub fn init(level: &str) {
    let filter = parse_level(level);
    if log::set_logger(&LOGGER).is_ok() {
        console_log!("logger installed at {filter}");
    }
    log::set_max_level(filter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
