// ── Auxiliary view pointers ──
//
// Which printer the side panel shows, and which one the update and
// maintenance dialogs target. Each slot holds an id, never a record;
// readers resolve it against the current store snapshot.

use std::collections::HashSet;

use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};
use tokio::sync::watch;
use tracing::debug;

use crate::model::EntityId;

/// A place in the UI that points at one printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ViewSlot {
    SidePanel,
    UpdateDialog,
    MaintenanceDialog,
}

pub struct ViewPointers {
    side_panel: watch::Sender<Option<EntityId>>,
    update_dialog: watch::Sender<Option<EntityId>>,
    maintenance_dialog: watch::Sender<Option<EntityId>>,
}

impl ViewPointers {
    pub(crate) fn new() -> Self {
        Self {
            side_panel: watch::channel(None).0,
            update_dialog: watch::channel(None).0,
            maintenance_dialog: watch::channel(None).0,
        }
    }

    pub fn get(&self, slot: ViewSlot) -> Option<EntityId> {
        self.sender(slot).borrow().clone()
    }

    pub fn subscribe(&self, slot: ViewSlot) -> watch::Receiver<Option<EntityId>> {
        self.sender(slot).subscribe()
    }

    pub(crate) fn set(&self, slot: ViewSlot, id: Option<EntityId>) {
        self.sender(slot).send_if_modified(|cur| {
            if *cur == id {
                return false;
            }
            *cur = id;
            true
        });
    }

    /// Unset every slot pointing at `id`.
    pub(crate) fn release(&self, id: &EntityId) {
        for slot in ViewSlot::iter() {
            let cleared = self.sender(slot).send_if_modified(|cur| {
                if cur.as_ref() == Some(id) {
                    *cur = None;
                    true
                } else {
                    false
                }
            });
            if cleared {
                debug!(slot = slot.as_ref(), printer_id = %id, "view pointer released");
            }
        }
    }

    /// Unset every slot whose id is not in `live`.
    pub(crate) fn retain(&self, live: &HashSet<EntityId>) {
        for slot in ViewSlot::iter() {
            let stale = self.get(slot).filter(|id| !live.contains(id));
            if let Some(id) = stale {
                self.release(&id);
            }
        }
    }

    fn sender(&self, slot: ViewSlot) -> &watch::Sender<Option<EntityId>> {
        match slot {
            ViewSlot::SidePanel => &self.side_panel,
            ViewSlot::UpdateDialog => &self.update_dialog,
            ViewSlot::MaintenanceDialog => &self.maintenance_dialog,
        }
    }
}
