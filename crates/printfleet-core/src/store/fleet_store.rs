// ── Central fleet store ──
//
// Owns the canonical printer records plus the id-keyed side state that
// refers to them (file buckets, selection, view pointers). Removing a
// printer here reconciles all of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::collection::EntityCollection;
use super::files::FileBuckets;
use super::selection::Selection;
use super::view::{ViewPointers, ViewSlot};
use crate::model::{EntityId, Printer};
use crate::stream::PrinterStream;

/// Client-side cache of the printer fleet.
///
/// Every read is a query over the current snapshot; nothing caches a
/// derived record, so lookups never go stale after a mutation.
pub struct FleetStore {
    pub(crate) printers: EntityCollection<Printer>,
    pub(crate) files: FileBuckets,
    pub(crate) selection: Selection,
    pub(crate) view: ViewPointers,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl FleetStore {
    pub fn new() -> Self {
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            printers: EntityCollection::new(Printer::display_order),
            files: FileBuckets::new(),
            selection: Selection::new(),
            view: ViewPointers::new(),
            last_full_refresh,
        }
    }

    // ── Printer mutations ────────────────────────────────────────────

    /// Add one printer. An existing record with the same id is overwritten.
    pub fn insert(&self, printer: Printer) {
        let id = printer.id.clone();
        if !self.printers.upsert(id.clone(), printer) {
            debug!(printer_id = %id, "insert overwrote existing printer");
        }
    }

    /// Overwrite the record for `id`. Unknown ids, and records carrying a
    /// different id than `id`, are logged and ignored.
    pub fn replace(&self, id: &EntityId, printer: Printer) -> bool {
        if printer.id != *id {
            warn!(
                printer_id = %id,
                record_id = %printer.id,
                "replace with mismatched record id ignored"
            );
            return false;
        }
        let replaced = self.printers.replace(id, printer);
        if !replaced {
            warn!(printer_id = %id, "replace for unknown printer ignored");
        }
        replaced
    }

    /// Remove a printer and everything that refers to it.
    /// Unknown ids are logged and ignored.
    pub fn remove(&self, id: &EntityId) -> Option<Arc<Printer>> {
        let Some(removed) = self.printers.remove(id) else {
            warn!(printer_id = %id, "remove for unknown printer ignored");
            return None;
        };
        self.files.purge(id);
        self.selection.forget(id);
        self.view.release(id);
        debug!(printer_id = %id, "printer removed");
        Some(removed)
    }

    // ── Printer queries ──────────────────────────────────────────────

    pub fn find(&self, id: &EntityId) -> Option<Arc<Printer>> {
        self.printers.get(id)
    }

    /// All printers, sorted by case-insensitive name.
    pub fn printers_snapshot(&self) -> Arc<Vec<Arc<Printer>>> {
        self.printers.snapshot()
    }

    pub fn printer_count(&self) -> usize {
        self.printers.len()
    }

    /// Bumped on every printer mutation.
    pub fn printers_version(&self) -> u64 {
        self.printers.version()
    }

    pub fn subscribe_printers(&self) -> PrinterStream {
        PrinterStream::new(self.printers.subscribe())
    }

    // ── Side state ───────────────────────────────────────────────────

    pub fn files(&self) -> &FileBuckets {
        &self.files
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewPointers {
        &self.view
    }

    /// Point `slot` at a known printer. Unknown ids leave the slot as is.
    pub fn point_view(&self, slot: ViewSlot, id: &EntityId) -> bool {
        if !self.printers.contains(id) {
            warn!(slot = slot.as_ref(), printer_id = %id, "cannot point view at unknown printer");
            return false;
        }
        self.view.set(slot, Some(id.clone()));
        true
    }

    pub fn clear_view(&self, slot: ViewSlot) {
        self.view.set(slot, None);
    }

    /// The printer `slot` currently points at, resolved against the
    /// latest records.
    pub fn view_printer(&self, slot: ViewSlot) -> Option<Arc<Printer>> {
        self.view.get(slot).and_then(|id| self.printers.get(&id))
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    /// How long ago the last full refresh occurred, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::model::FileEntry;

    fn printer(id: &str, name: &str) -> Printer {
        Printer::new(id, name).with_reachable(true)
    }

    fn names(store: &FleetStore) -> Vec<String> {
        store
            .printers_snapshot()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn insert_keeps_name_order() {
        let store = FleetStore::new();
        store.insert(printer("1", "zeta"));
        store.insert(printer("2", "Alpha"));
        store.insert(printer("3", "beta"));
        assert_eq!(names(&store), ["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn replace_by_id_resorts() {
        let store = FleetStore::new();
        store.insert(printer("1", "a"));
        store.insert(printer("2", "b"));

        assert!(store.replace(&EntityId::from("1"), printer("1", "c")));
        assert_eq!(names(&store), ["b", "c"]);
        assert_eq!(store.printer_count(), 2);
    }

    #[test]
    fn replace_unknown_is_noop() {
        let store = FleetStore::new();
        store.insert(printer("1", "a"));
        assert!(!store.replace(&EntityId::from("2"), printer("2", "b")));
        assert_eq!(names(&store), ["a"]);
    }

    #[test]
    fn replace_with_foreign_id_keeps_one_record_per_id() {
        let store = FleetStore::new();
        store.insert(printer("1", "a"));

        assert!(!store.replace(&EntityId::from("1"), printer("2", "b")));
        store.insert(printer("2", "c"));

        let ids: Vec<EntityId> = store
            .printers_snapshot()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids, [EntityId::from("1"), EntityId::from("2")]);
        assert_eq!(store.find(&EntityId::from("1")).unwrap().name, "a");
    }

    #[test]
    fn remove_reconciles_side_state() {
        let store = FleetStore::new();
        let p = printer("1", "a");
        store.insert(p.clone());
        store.files.ingest(&p.id, vec![FileEntry::new("x", Utc.timestamp_opt(0, 0).unwrap())]);
        store.selection.toggle(&p);
        assert!(store.point_view(ViewSlot::SidePanel, &p.id));

        assert!(store.remove(&p.id).is_some());
        assert!(store.find(&p.id).is_none());
        assert!(store.files().bucket(&p.id).is_none());
        assert!(!store.selection().contains(&p.id));
        assert!(store.view_printer(ViewSlot::SidePanel).is_none());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let store = FleetStore::new();
        store.insert(printer("1", "a"));
        let version = store.printers_version();
        assert!(store.remove(&EntityId::from("2")).is_none());
        assert_eq!(store.printers_version(), version);
    }

    #[test]
    fn view_resolves_to_latest_record() {
        let store = FleetStore::new();
        store.insert(printer("1", "old"));
        store.point_view(ViewSlot::UpdateDialog, &EntityId::from("1"));
        store.replace(&EntityId::from("1"), printer("1", "new"));

        assert_eq!(store.view_printer(ViewSlot::UpdateDialog).unwrap().name, "new");
    }

    #[test]
    fn cannot_point_at_unknown_printer() {
        let store = FleetStore::new();
        assert!(!store.point_view(ViewSlot::SidePanel, &EntityId::from("9")));
        assert!(store.view().get(ViewSlot::SidePanel).is_none());
    }
}
