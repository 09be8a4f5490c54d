//! Diary record persistence
//!
//! One JSON document per session per day, human-readable, written
//! atomically (write to a scratch file, then rename into place). A second
//! session on the same day overwrites that day's record; the key is
//! deterministic.

use crate::error::{DiaryError, Result};
use crate::session::{Emotion, Transcript};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The persisted artifact of one session. Created once at session end,
/// written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryRecord {
    pub date: NaiveDate,

    pub transcript: Transcript,

    /// First-person narrative summary (or the fixed failure text)
    pub summary: String,

    /// Aggregate emotion over all tagged user turns
    pub emotion: Emotion,

    /// Completed capability calls over the whole session
    pub calls_used: usize,
}

impl DiaryRecord {
    /// Build the record, deriving the aggregate emotion from the transcript.
    pub fn build(
        date: NaiveDate,
        transcript: Transcript,
        summary: String,
        calls_used: usize,
    ) -> Self {
        let emotion = transcript.aggregate_emotion();
        Self {
            date,
            transcript,
            summary,
            emotion,
            calls_used,
        }
    }
}

/// Deterministic record key: `diary-<YYYY-MM-DD>.json` under `dir`.
pub fn record_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("diary-{}.json", date.format("%Y-%m-%d")))
}

/// Write the record for its date, atomically. Returns the record's path.
pub fn persist(dir: &Path, record: &DiaryRecord) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| DiaryError::Persistence(format!("{}: {e}", dir.display())))?;

    let path = record_path(dir, record.date);
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| DiaryError::Persistence(e.to_string()))?;

    let scratch = path.with_extension("json.tmp");
    fs::write(&scratch, json)
        .map_err(|e| DiaryError::Persistence(format!("{}: {e}", scratch.display())))?;
    fs::rename(&scratch, &path)
        .map_err(|e| DiaryError::Persistence(format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), calls_used = record.calls_used, "diary record saved");
    Ok(path)
}

/// Read a previously persisted record back.
pub fn load(path: &Path) -> Result<DiaryRecord> {
    let json = fs::read_to_string(path)
        .map_err(|e| DiaryError::Persistence(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| DiaryError::Persistence(e.to_string()))
}
