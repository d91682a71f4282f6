//! Session history
//!
//! An append-only log of generation attempts. Entries are never mutated;
//! `clear` discards everything. The log lives as long as its owner unless it
//! is exported and loaded again.

use crate::kind::GenerationKind;
use crate::request::{GenerationRequest, GenerationResult};
use chrono::{DateTime, Local};
use iron_core::{IronError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of a generation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Success,
    Failure,
}

/// A single recorded attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry ID (UUID)
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub kind: GenerationKind,
    pub prompt: String,
    pub status: EntryStatus,
    #[serde(default)]
    pub result: Option<GenerationResult>,
    /// Error message for failed attempts
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Entry for a successful dispatch, stamped with the result's creation time
    pub fn success(request: &GenerationRequest, result: GenerationResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: result.created_at,
            kind: request.kind(),
            prompt: request.prompt().to_string(),
            status: EntryStatus::Success,
            result: Some(result),
            error: None,
        }
    }

    /// Entry for a failed dispatch
    pub fn failure(request: &GenerationRequest, error: &IronError, at: DateTime<Local>) -> Self {
        Self::rejected(request.kind(), request.prompt(), error, at)
    }

    /// Entry for an attempt that never became a valid request
    pub fn rejected(
        kind: GenerationKind,
        prompt: &str,
        error: &IronError,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: at,
            kind,
            prompt: prompt.to_string(),
            status: EntryStatus::Failure,
            result: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EntryStatus::Success
    }
}

/// Order for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// JSON wrapper written by `export`
#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    exported_at: String,
    entries: Vec<HistoryEntry>,
}

/// Append-only log of generation attempts, oldest first
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries whose kind is in `kinds` (all kinds when empty), in the given order
    pub fn query(&self, kinds: &[GenerationKind], order: HistoryOrder) -> Vec<HistoryEntry> {
        let matches = |e: &&HistoryEntry| kinds.is_empty() || kinds.contains(&e.kind);
        match order {
            HistoryOrder::OldestFirst => self.entries.iter().filter(matches).cloned().collect(),
            HistoryOrder::NewestFirst => {
                self.entries.iter().rev().filter(matches).cloned().collect()
            }
        }
    }

    /// Discard all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the whole log as pretty JSON
    pub fn export(&self) -> Result<String> {
        let file = HistoryFile {
            exported_at: Local::now().to_rfc3339(),
            entries: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Append the entries of a previous export, returning how many were added
    pub fn import(&mut self, json: &str) -> Result<usize> {
        let file: HistoryFile = serde_json::from_str(json)
            .map_err(|e| IronError::Serialization(format!("Failed to parse history: {}", e)))?;
        let added = file.entries.len();
        self.entries.extend(file.entries);
        Ok(added)
    }

    /// Write `export()` to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.export()?)?;
        Ok(())
    }

    /// Load a log previously written by `save`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut history = Self::new();
        history.import(&content)?;
        Ok(history)
    }
}
