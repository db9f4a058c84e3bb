//! Colored stderr logger behind the `log` facade.
//!
//! Tags follow the CLI's `[INF]` / `[WRN]` style. Verbosity maps from the
//! repeatable `-v` flag.

use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};

struct TagLogger {
    level: LevelFilter,
}

pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERR".bold().red(),
        Level::Warn => "WRN".bold().yellow(),
        Level::Info => "INF".bold().green(),
        Level::Debug => "DBG".bold().blue(),
        Level::Trace => "TRC".bold().magenta(),
    }
}

pub fn format_line(level: Level, message: &str) -> String {
    format!(
        "{}{}{} {}",
        "[".bold().white(),
        tag(level),
        "]".bold().white(),
        message
    )
}

impl Log for TagLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("rostersearch")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), &record.args().to_string());
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs the logger once; later calls only adjust the level.
pub fn init(verbosity: u8) {
    let level = level_for_verbosity(verbosity);
    if log::set_boxed_logger(Box::new(TagLogger { level })).is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}
