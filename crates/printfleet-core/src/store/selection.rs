// ── Operator selection for batch actions ──

use std::collections::{BTreeSet, HashSet};

use tokio::sync::watch;
use tracing::debug;

use crate::model::{EntityId, Printer};

/// Printer ids marked for batch operations.
///
/// Only reachable printers may be added; removal is always allowed.
/// Purely local: nothing here talks to the print server.
pub struct Selection {
    ids: watch::Sender<BTreeSet<EntityId>>,
}

impl Selection {
    pub(crate) fn new() -> Self {
        let (ids, _) = watch::channel(BTreeSet::new());
        Self { ids }
    }

    /// Flip membership of `printer`. Returns whether it is selected afterwards.
    pub fn toggle(&self, printer: &Printer) -> bool {
        let mut selected = false;
        self.ids.send_if_modified(|ids| {
            if ids.remove(&printer.id) {
                return true;
            }
            if printer.reachable {
                ids.insert(printer.id.clone());
                selected = true;
                true
            } else {
                debug!(printer_id = %printer.id, "unreachable printer not selectable");
                false
            }
        });
        selected
    }

    pub fn clear(&self) {
        self.ids.send_if_modified(|ids| {
            let changed = !ids.is_empty();
            ids.clear();
            changed
        });
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.borrow().contains(id)
    }

    /// Selected ids in ascending id order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.ids.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<EntityId>> {
        self.ids.subscribe()
    }

    /// Read and clear in one step.
    pub(crate) fn take(&self) -> Vec<EntityId> {
        let mut taken = Vec::new();
        self.ids.send_if_modified(|ids| {
            taken = std::mem::take(ids).into_iter().collect();
            !taken.is_empty()
        });
        taken
    }

    /// Deselect a printer that no longer exists.
    pub(crate) fn forget(&self, id: &EntityId) -> bool {
        self.ids.send_if_modified(|ids| ids.remove(id))
    }

    /// Keep only ids present in `live`.
    pub(crate) fn retain(&self, live: &HashSet<EntityId>) {
        self.ids.send_if_modified(|ids| {
            let before = ids.len();
            ids.retain(|id| live.contains(id));
            ids.len() != before
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable(id: &str) -> Printer {
        Printer::new(id, id).with_reachable(true)
    }

    #[test]
    fn unreachable_printer_is_not_added() {
        let sel = Selection::new();
        let p = Printer::new("1", "offline");
        assert!(!sel.toggle(&p));
        assert!(sel.is_empty());
    }

    #[test]
    fn double_toggle_restores_prior_state() {
        let sel = Selection::new();
        sel.toggle(&reachable("a"));
        let before = sel.ids();

        let p = reachable("b");
        assert!(sel.toggle(&p));
        assert!(sel.contains(&p.id));
        assert!(!sel.toggle(&p));
        assert_eq!(sel.ids(), before);
    }

    #[test]
    fn removal_ignores_reachability() {
        let sel = Selection::new();
        let mut p = reachable("1");
        sel.toggle(&p);

        p.reachable = false;
        assert!(!sel.toggle(&p));
        assert!(!sel.contains(&p.id));
    }

    #[test]
    fn take_empties_selection() {
        let sel = Selection::new();
        sel.toggle(&reachable("2"));
        sel.toggle(&reachable("1"));

        assert_eq!(sel.take(), vec![EntityId::from("1"), EntityId::from("2")]);
        assert!(sel.is_empty());
        assert!(sel.take().is_empty());
    }

    #[test]
    fn clear_and_forget() {
        let sel = Selection::new();
        sel.toggle(&reachable("1"));
        sel.toggle(&reachable("2"));

        assert!(sel.forget(&EntityId::from("1")));
        assert!(!sel.forget(&EntityId::from("1")));
        assert_eq!(sel.len(), 1);

        sel.clear();
        assert!(sel.is_empty());
    }
}
