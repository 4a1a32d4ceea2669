use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Durable saved-questions list: one JSON array of question texts in one
/// file, exact-match deduplicated, insertion-ordered.
pub struct SavedStore {
    path: PathBuf,
}

impl SavedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file or undecodable content reads as an empty list.
    pub fn entries(&self) -> Vec<String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!(
                    "Ignoring malformed saved list in {}: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Appends a question text unless it is empty or already present.
    /// Returns whether the list changed.
    pub fn save(&self, text: &str) -> Result<bool> {
        if text.is_empty() {
            return Ok(false);
        }

        let mut entries = self.entries();
        if entries.iter().any(|entry| entry == text) {
            log::debug!("Question already saved: {}", text);
            return Ok(false);
        }

        entries.push(text.to_string());
        self.persist(&entries)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to clear saved list at {}", self.path.display())),
        }
    }

    fn persist(&self, entries: &[String]) -> Result<()> {
        let data =
            serde_json::to_string_pretty(entries).context("failed to serialize saved list")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write saved list to {}", self.path.display()))
    }
}
