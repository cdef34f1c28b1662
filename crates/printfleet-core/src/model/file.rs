// ── Remote file inventory types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A file or directory stored on a printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    pub date: DateTime<Utc>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            date,
        }
    }
}

/// Newest first.
pub(crate) fn sort_newest_first(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The cached inventory for one printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBucket {
    pub printer_id: EntityId,
    /// Sorted newest first.
    pub entries: Vec<FileEntry>,
    pub updated_at: DateTime<Utc>,
}

/// Response of a file listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Response of a "clear files" call.
///
/// `failed_files` lists what the printer could not remove. A response
/// without it is malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearFilesResponse {
    pub failed_files: Option<Vec<FileEntry>>,
}

/// Aggregate outcome of a batch reprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReprintReport {
    #[serde(default)]
    pub accepted: u32,
    #[serde(default)]
    pub rejected: u32,
    #[serde(default)]
    pub message: Option<String>,
}
