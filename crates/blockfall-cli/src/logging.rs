//! File-backed `log` sink. The terminal belongs to the TUI, so records go to
//! a file instead of stderr.

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write as _},
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Debug)]
struct FileLogger {
    level: LevelFilter,
    writer: Mutex<BufWriter<File>>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        _ = writeln!(
            writer,
            "{} {:<5} {}: {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            _ = writer.flush();
        }
    }
}

/// Appends log records at or above `level` to the file at `path`.
pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    let logger = FileLogger {
        level,
        writer: Mutex::new(BufWriter::new(file)),
    };
    log::set_boxed_logger(Box::new(logger)).context("Logger already initialized")?;
    log::set_max_level(level);
    log::info!("logging to {} at {level}", path.display());
    Ok(())
}

/// Flushes buffered records. Call before the process exits.
pub fn flush() {
    log::logger().flush();
}
