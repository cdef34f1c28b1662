// ── Filter predicates for printer snapshots ──
//
// Lets consumers narrow a snapshot without re-querying the print server.

use crate::model::{EntityId, Printer};

/// Filter predicate for printer collections.
pub enum PrinterFilter {
    All,
    Reachable,
    Unreachable,
    /// Confirmed printing.
    Printing,
    /// Reachable and confirmed not printing.
    Idle,
    /// No printing status received yet.
    StatusUnknown,
    Ids(Vec<EntityId>),
    Custom(Box<dyn Fn(&Printer) -> bool + Send + Sync>),
}

impl PrinterFilter {
    pub fn matches(&self, printer: &Printer) -> bool {
        let printing = printer.state_flags.printing;
        match self {
            Self::All => true,
            Self::Reachable => printer.reachable,
            Self::Unreachable => !printer.reachable,
            Self::Printing => printing.is_on(),
            Self::Idle => printer.reachable && printing.is_off(),
            Self::StatusUnknown => !printing.is_known(),
            Self::Ids(ids) => ids.contains(&printer.id),
            Self::Custom(f) => f(printer),
        }
    }
}
