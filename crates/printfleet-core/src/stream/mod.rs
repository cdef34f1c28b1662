// ── Printer list subscriptions ──
//
// A handle on the store's sorted printer list. Hosts render from
// `current()` and park on `changed()` between frames.

mod filter;

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Printer;

pub use filter::PrinterFilter;

/// One published printer list, in display order.
pub type PrinterSnapshot = Arc<Vec<Arc<Printer>>>;

/// Subscription to the printer list.
pub struct PrinterStream {
    seen: PrinterSnapshot,
    rx: watch::Receiver<PrinterSnapshot>,
}

impl PrinterStream {
    pub(crate) fn new(rx: watch::Receiver<PrinterSnapshot>) -> Self {
        let seen = Arc::clone(&rx.borrow());
        Self { seen, rx }
    }

    /// The list as of creation or the last `changed()`.
    pub fn current(&self) -> &PrinterSnapshot {
        &self.seen
    }

    /// Printers from `current()` that pass `filter`, still in display order.
    pub fn matching(&self, filter: &PrinterFilter) -> Vec<Arc<Printer>> {
        self.seen
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Wait for the next published list. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<PrinterSnapshot> {
        self.rx.changed().await.ok()?;
        self.seen = Arc::clone(&self.rx.borrow_and_update());
        Some(Arc::clone(&self.seen))
    }

    /// Every published list as a `Stream`, starting with the latest one.
    pub fn into_stream(self) -> WatchStream<PrinterSnapshot> {
        WatchStream::new(self.rx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;

    use super::PrinterFilter;
    use crate::model::{Printer, StatusFlag};
    use crate::store::FleetStore;

    #[tokio::test]
    async fn changed_tracks_store_mutations() {
        let store = FleetStore::new();
        let mut printers = store.subscribe_printers();
        assert!(printers.current().is_empty());

        store.insert(Printer::new("1", "b"));
        store.insert(Printer::new("2", "a"));

        let snap = printers.changed().await.unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].name, "a");
        assert_eq!(printers.current().len(), 2);
    }

    #[test]
    fn matching_keeps_display_order() {
        let store = FleetStore::new();
        store.insert(
            Printer::new("1", "Zed")
                .with_reachable(true)
                .with_flags(StatusFlag::On, StatusFlag::Off),
        );
        store.insert(Printer::new("2", "Ann").with_reachable(true));
        store.insert(
            Printer::new("3", "bob")
                .with_reachable(true)
                .with_flags(StatusFlag::On, StatusFlag::Off),
        );

        let idle = store.subscribe_printers().matching(&PrinterFilter::Idle);
        let names: Vec<&str> = idle.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["bob", "Zed"]);
    }

    #[tokio::test]
    async fn stream_starts_with_latest_list() {
        let store = FleetStore::new();
        let printers = store.subscribe_printers();
        store.insert(Printer::new("1", "a"));

        let mut s = printers.into_stream();
        assert_eq!(s.next().await.unwrap().len(), 1);
    }
}
