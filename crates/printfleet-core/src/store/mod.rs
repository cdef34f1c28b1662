// ── Fleet state containers ──
//
// Ordered printer records, per-printer file buckets, the operator's
// selection, and the view pointers, with push-based change notification.

mod collection;
mod files;
mod fleet_store;
mod refresh;
mod selection;
mod view;

pub use files::FileBuckets;
pub use fleet_store::FleetStore;
pub use selection::Selection;
pub use view::{ViewPointers, ViewSlot};
