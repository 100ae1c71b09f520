//! Capped log of previously visited branches, oldest first.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::DATA_DIR;

/// Default number of entries kept.
pub const DEFAULT_LIMIT: usize = 40;

#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    limit: usize,
}

impl History {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    /// History file under the repository's control dir.
    pub fn in_control_dir(control_dir: &Path, limit: usize) -> Self {
        Self::new(control_dir.join(DATA_DIR).join("history"), limit)
    }

    /// All entries; a missing file means nothing was ever recorded.
    pub fn read(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Err(Error::HistoryEmpty);
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(text
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Most recent entry. It stays in the log.
    pub fn latest(&self) -> Result<String> {
        self.read()?.pop().ok_or(Error::HistoryEmpty)
    }

    /// Record `name` and keep only the last `limit` entries.
    pub fn append(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }

        let mut entries = match self.read() {
            Ok(entries) => entries,
            Err(Error::HistoryEmpty) => Vec::new(),
            Err(e) => return Err(e),
        };
        entries.push(name.to_string());
        if entries.len() > self.limit {
            entries.drain(..entries.len() - self.limit);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = entries.join("\n");
        text.push('\n');
        fs::write(&self.path, text)?;
        debug!(branch = %name, entries = entries.len(), "history appended");
        Ok(())
    }
}
