// ── Per-printer file inventory ──

use std::collections::HashSet;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::model::file::sort_newest_first;
use crate::model::{EntityId, FileBucket, FileEntry};

/// Latest fetched file list per printer.
///
/// One bucket per printer id, created on first ingest and overwritten in
/// place afterwards.
pub struct FileBuckets {
    buckets: DashMap<EntityId, FileBucket>,
}

impl FileBuckets {
    pub(crate) fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    pub fn bucket(&self, printer_id: &EntityId) -> Option<FileBucket> {
        self.buckets.get(printer_id).map(|b| b.value().clone())
    }

    /// Cached entries for `printer_id`, newest first.
    pub fn entries(&self, printer_id: &EntityId) -> Option<Vec<FileEntry>> {
        self.buckets.get(printer_id).map(|b| b.entries.clone())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sort `entries` newest first and store them as the bucket's contents.
    /// Returns the sorted list.
    pub(crate) fn ingest(&self, printer_id: &EntityId, mut entries: Vec<FileEntry>) -> Vec<FileEntry> {
        sort_newest_first(&mut entries);
        let now = Utc::now();

        self.buckets
            .entry(printer_id.clone())
            .and_modify(|b| {
                b.entries.clone_from(&entries);
                b.updated_at = now;
            })
            .or_insert_with(|| FileBucket {
                printer_id: printer_id.clone(),
                entries: entries.clone(),
                updated_at: now,
            });

        debug!(printer_id = %printer_id, files = entries.len(), "file bucket updated");
        entries
    }

    /// Drop `path` from the bucket.
    ///
    /// Returns the remaining entries, or `None` when no bucket exists. A
    /// missing bucket or path is logged and leaves everything untouched.
    pub(crate) fn remove_entry(&self, printer_id: &EntityId, path: &str) -> Option<Vec<FileEntry>> {
        let Some(mut bucket) = self.buckets.get_mut(printer_id) else {
            warn!(printer_id = %printer_id, path, "no file bucket for printer; nothing to remove");
            return None;
        };

        match bucket.entries.iter().position(|f| f.path == path) {
            Some(idx) => {
                bucket.entries.remove(idx);
                bucket.updated_at = Utc::now();
            }
            None => {
                warn!(printer_id = %printer_id, path, "file not present in bucket");
            }
        }
        Some(bucket.entries.clone())
    }

    /// Forget the bucket for a printer that no longer exists.
    pub(crate) fn purge(&self, printer_id: &EntityId) -> bool {
        self.buckets.remove(printer_id).is_some()
    }

    /// Keep only buckets whose printer id is in `live`.
    pub(crate) fn retain(&self, live: &HashSet<EntityId>) {
        self.buckets.retain(|id, _| live.contains(id));
    }
}
