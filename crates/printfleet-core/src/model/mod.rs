// ── Domain model ──
//
// Canonical representations of what the print server reports. Service
// collaborators decode into these; the store and controller only ever
// handle these types.

pub mod entity_id;
pub mod file;
pub mod printer;

// ── Re-exports ──────────────────────────────────────────────────────

pub use entity_id::EntityId;
pub use file::{BatchReprintReport, ClearFilesResponse, FileBucket, FileEntry, FileListing};
pub use printer::{Printer, PrinterSpec, PrinterState, StatusFlag};
