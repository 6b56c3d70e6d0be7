//! Edit log model plus loading, per-file grouping and chronological ordering.
//!
//! The editor recorder writes one JSON document per capture: a `history`
//! array of edit entries (each carrying pre-computed diff hunks) and an
//! optional snapshot of the file that was open at capture time.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{DatasetError, Result};

/// Top-level recorder document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogData {
    #[serde(default)]
    pub history: Vec<LogEntry>,
    /// Full text of the file open in the editor when the log was captured.
    pub file_content: Option<String>,
}

/// One recorded edit event.
///
/// `fileName` and `hunks` may be absent or empty; such entries are simply
/// not eligible for the dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub file_name: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub hunks: Option<Vec<Hunk>>,
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub line_numbers: Option<LineNumbers>,
}

impl LogEntry {
    /// File name and hunks, if the entry has a non-empty value for both.
    pub fn eligible(&self) -> Option<(&str, &[Hunk])> {
        let file_name = self.file_name.as_deref().filter(|name| !name.is_empty())?;
        let hunks = self.hunks.as_deref().filter(|hunks| !hunks.is_empty())?;
        Some((file_name, hunks))
    }
}

/// Translation record from hunk-relative to file-absolute line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineNumbers {
    pub start: i64,
    pub end: Option<i64>,
    pub current: Option<i64>,
}

impl LineNumbers {
    /// Absolute line for a 1-based hunk-relative line.
    pub fn translate(&self, relative: i64) -> i64 {
        self.start + relative - 1
    }
}

/// `lineNumbers` that is `null`, absent or `{}` means "no translation".
fn empty_object_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<LineNumbers>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    match map {
        Some(map) if !map.is_empty() => LineNumbers::deserialize(serde_json::Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn default_start() -> i64 {
    1
}

/// One contiguous block of line operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hunk {
    #[serde(default = "default_start")]
    pub old_start: i64,
    #[serde(default = "default_start")]
    pub new_start: i64,
    pub lines: Vec<LineOp>,
}

/// A single line-level operation inside a hunk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum LineOp {
    Delete { text: String },
    Insert { text: String },
    Context { text: String },
    /// Any op tag the recorder may emit that we do not render.
    #[serde(other)]
    Other,
}

/// Event time as written by the recorder: epoch millis or an ISO string.
///
/// Integral numbers stay exact; only fractional ones go through `f64`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Timestamp {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Timestamp::Integer(_) | Timestamp::Float(_))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timestamp::Integer(a), Timestamp::Integer(b)) => a.cmp(b),
            (Timestamp::Float(a), Timestamp::Float(b)) => a.total_cmp(b),
            (Timestamp::Integer(a), Timestamp::Float(b)) => (*a as f64).total_cmp(b),
            (Timestamp::Float(a), Timestamp::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Timestamp::Text(a), Timestamp::Text(b)) => a.cmp(b),
            (Timestamp::Text(_), _) => Ordering::Greater,
            (_, Timestamp::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Integer(n) => write!(f, "{}", n),
            Timestamp::Float(n) => write!(f, "{}", n),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

/// All eligible entries of one file, in original encounter order.
#[derive(Debug, Clone)]
pub struct FileHistory<'a> {
    pub file_name: &'a str,
    /// `(position in LogData::history, entry)`
    pub entries: Vec<(usize, &'a LogEntry)>,
}

/// An eligible entry placed on the global timeline.
#[derive(Debug, Clone, Copy)]
pub struct OrderedEntry<'a> {
    /// Position of the entry in `LogData::history`.
    pub index: usize,
    pub file_name: &'a str,
    pub timestamp: &'a Timestamp,
    pub hunks: &'a [Hunk],
    pub line_numbers: Option<&'a LineNumbers>,
}

/// Parse a recorder document from a JSON string.
pub fn parse_log(json: &str) -> Result<LogData> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a recorder document from disk.
pub fn load_log_file(path: &Path) -> Result<LogData> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Group eligible entries by file name.
///
/// Files appear in order of their first eligible entry.
pub fn group_by_file(data: &LogData) -> Vec<FileHistory<'_>> {
    let mut groups: Vec<FileHistory<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in data.history.iter().enumerate() {
        let Some((file_name, _)) = entry.eligible() else {
            continue;
        };
        let slot = *positions.entry(file_name).or_insert_with(|| {
            groups.push(FileHistory {
                file_name,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push((index, entry));
    }

    groups
}

/// Every eligible entry across all files, ordered by timestamp.
///
/// Ties keep their original encounter order. Fails if an eligible entry
/// has no timestamp, or if numeric and text timestamps are mixed.
pub fn order_entries(data: &LogData) -> Result<Vec<OrderedEntry<'_>>> {
    let groups = group_by_file(data);
    for group in &groups {
        debug!(file = group.file_name, entries = group.entries.len(), "grouped edit history");
    }

    let mut ordered = Vec::new();
    for group in groups {
        for (index, entry) in group.entries {
            let timestamp = entry.timestamp.as_ref().ok_or_else(|| DatasetError::MissingTimestamp {
                index,
                file_name: group.file_name.to_string(),
            })?;
            ordered.push(OrderedEntry {
                index,
                file_name: group.file_name,
                timestamp,
                hunks: entry.hunks.as_deref().unwrap_or_default(),
                line_numbers: entry.line_numbers.as_ref(),
            });
        }
    }

    if let Some(first) = ordered.first() {
        let numeric = first.timestamp.is_numeric();
        if ordered.iter().any(|e| e.timestamp.is_numeric() != numeric) {
            return Err(DatasetError::MixedTimestamps);
        }
    }

    ordered.sort_by(|a, b| a.timestamp.cmp(b.timestamp).then_with(|| a.index.cmp(&b.index)));
    Ok(ordered)
}
