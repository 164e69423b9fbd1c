//! Logging setup: `env_logger` writing every line to stdout and to the log
//! file at once.
//!
//! The default level comes from the config (`info` unless changed) and can be
//! overridden per module through `RUST_LOG`:
//! ```bash
//! RUST_LOG=debug order_bot --symbol BTCUSDT ...
//! RUST_LOG=futures_order_bot::exchanges=debug order_bot ...
//! ```

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

use crate::config::LoggingConfig;

/// Writes everything to two sinks. The first error wins.
pub struct TeeWriter<A: Write, B: Write> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.secondary.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

/// `2024-05-01 12:00:00 - futures_order_bot::execution - INFO - message`
pub fn format_line(timestamp: &str, target: &str, level: Level, message: &str) -> String {
    format!("{} - {} - {} - {}", timestamp, target, level, message)
}

pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Initializes the global logger. Call once, before building the client.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file = open_log_file(&config.file)?;
    let default_level = config
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);

    let mut builder = Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let line = format_line(&ts, record.target(), record.level(), &record.args().to_string());
            writeln!(buf, "{}", line)
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(io::stdout(), file))))
        .try_init()
        .context("logger already initialized")?;

    log::info!("Logging to {} (level {})", config.file.display(), default_level);
    Ok(())
}
