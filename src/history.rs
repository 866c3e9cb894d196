//! Calculation history.
//!
//! Keeps a bounded, ordered log of evaluated expressions in memory with
//! optional persistence to a JSON file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::{DEFAULT_PRECISION, format_significant};

/// Default number of entries kept in memory.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid history file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single calculation in history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    #[serde(serialize_with = "result_writer", deserialize_with = "result_reader")]
    pub result: f64,
    pub timestamp: DateTime<Local>,
}

/// JSON has no infinity or NaN, so those results are stored as strings.
fn result_writer<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Reads what [`result_writer`] writes, plus `null`, which is how plain
/// serde_json writes non-finite floats.
fn result_reader<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ResultReader;
    impl<'de> Visitor<'de> for ResultReader {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, \"Infinity\", \"-Infinity\", \"NaN\" or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            match v {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(f64::NAN)
        }
    }

    deserializer.deserialize_any(ResultReader)
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(expression: impl Into<String>, result: f64) -> Self {
        Self::with_timestamp(expression, result, Local::now())
    }

    pub fn with_timestamp(expression: impl Into<String>, result: f64, timestamp: DateTime<Local>) -> Self {
        Self {
            expression: expression.into(),
            result,
            timestamp,
        }
    }

    /// Format entry for display, e.g. `3+4 = 7`.
    pub fn format_display(&self) -> String {
        format!(
            "{} = {}",
            self.expression,
            format_significant(self.result, DEFAULT_PRECISION)
        )
    }

    fn matches(&self, query: &str) -> bool {
        self.expression.to_lowercase().contains(query)
            || format!("{:?}", self.result).contains(query)
            || format_significant(self.result, DEFAULT_PRECISION).contains(query)
    }
}

/// On-disk layout of a history file.
#[derive(Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    max_entries: Option<usize>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Bounded calculation history, oldest first.
#[derive(Clone, Debug)]
pub struct HistoryManager {
    max_entries: usize,
    entries: Vec<HistoryEntry>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryManager {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            entries: Vec::new(),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a calculation, dropping the oldest entries beyond capacity.
    pub fn add_entry(&mut self, expression: impl Into<String>, result: f64) {
        self.push(HistoryEntry::new(expression, result));
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.truncate();
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Entries with the most recent last.
    ///
    /// `Some(n)` keeps only the last `n` entries; `None` returns everything.
    pub fn entries(&self, limit: Option<usize>) -> &[HistoryEntry] {
        match limit {
            Some(n) => &self.entries[self.entries.len().saturating_sub(n)..],
            None => &self.entries,
        }
    }

    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        self.entries(Some(count))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Case-insensitive search over expressions and results.
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let query = query.to_lowercase();
        self.entries.iter().filter(|e| e.matches(&query)).collect()
    }

    /// Get an entry by index; negative indices count from the end.
    pub fn get(&self, index: isize) -> Option<&HistoryEntry> {
        let index = if index < 0 {
            self.entries.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.entries.get(index)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), HistoryError> {
        let file = HistoryFile {
            max_entries: Some(self.max_entries),
            history: self.entries.clone(),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&file)?)?;

        tracing::info!(path = %path.display(), entries = self.entries.len(), "saved history");
        Ok(())
    }

    /// Replace the in-memory history with the contents of a file.
    ///
    /// A `max_entries` stored in the file takes precedence over the current one.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), HistoryError> {
        let contents = fs::read_to_string(path)?;
        let file: HistoryFile = serde_json::from_str(&contents)?;

        if let Some(max_entries) = file.max_entries {
            self.max_entries = max_entries;
        }
        self.entries = file.history;
        self.truncate();

        tracing::info!(path = %path.display(), entries = self.entries.len(), "loaded history");
        Ok(())
    }

    /// Format history for text display.
    pub fn format_history_display(&self, limit: Option<usize>) -> String {
        let entries = self.entries(limit);
        if entries.is_empty() {
            return "No calculation history".to_string();
        }

        let mut lines = vec!["Calculation History:".to_string(), "-".repeat(40)];
        for (i, entry) in entries.iter().enumerate() {
            lines.push(format!(
                "{}. [{}] {}",
                i + 1,
                entry.timestamp.format("%H:%M:%S"),
                entry.format_display()
            ));
        }

        lines.join("\n")
    }
}
