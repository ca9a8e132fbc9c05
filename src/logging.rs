use std::path::Path;

use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Sends log records to stderr, colored, and to `log_file` as plain text.
///
/// Only records from this crate pass `level`; dependencies are held at `warn`.
pub fn enable_logging(level: LevelFilter, log_file: &Path) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let stderr = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(
            fern::log_file(log_file)
                .with_context(|| format!("Failed to open log file {}", log_file.display()))?,
        );

    fern::Dispatch::new()
        .level(LevelFilter::Warn.min(level))
        .level_for(env!("CARGO_PKG_NAME").replace('-', "_"), level)
        .chain(stderr)
        .chain(file)
        .apply()
        .context("Failed to install logger")
}
