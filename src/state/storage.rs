use std::{
    collections::HashMap,
    fmt::Display,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// The three independently persisted pieces of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Entries,
    HourlyRate,
    AmountPaid,
}
impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Entries, Slot::HourlyRate, Slot::AmountPaid];

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Entries => "entries",
            Slot::HourlyRate => "hourly_rate",
            Slot::AmountPaid => "amount_paid",
        }
    }
}
impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A local string-keyed substrate the entry store persists into.
///
/// A key that was never written reads back as `None`.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps every key in its own file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}
impl FileStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(x) => Ok(Some(x)),
            Err(x) => match x.kind() {
                ErrorKind::NotFound => Ok(None),
                _ => Err(x).with_context(|| format!("Failed to read {}", path.display())),
            },
        }
    }

    /// Writes next to the key's file first and renames over it, so the old
    /// value stays intact if the write is cut short.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let temporary = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&temporary, value)
            .with_context(|| format!("Failed to write {}", temporary.display()))?;
        std::fs::rename(&temporary, &path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                temporary.display(),
                path.display()
            )
        })
    }
}

/// Keeps everything in memory. Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
