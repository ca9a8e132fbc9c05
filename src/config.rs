use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

pub const APP_NAME: &str = "work-hours";
pub const DATA_DIR_ENV: &str = "WORK_HOURS_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "WORK_HOURS_LOG";
pub const LOG_FILE_NAME: &str = "work-hours.log";

/// Settings for the process itself, as opposed to the tracker's own settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}
impl Config {
    /// Fills in defaults for whatever wasn't given on the command line or in the environment.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<LevelFilter>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(x) => x,
            None => default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            log_level: log_level.unwrap_or(LevelFilter::Warn),
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

/// `work-hours` inside the platform's local data directory.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|x| x.join(APP_NAME))
        .context("Couldn't find a local data directory, set WORK_HOURS_DATA_DIR")
}

/// Loads `.env` from the working directory if there is one.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

pub fn parse_log_level(s: &str) -> Result<LevelFilter, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("unknown log level {s:?}, expected off, error, warn, info, debug or trace"))
}
