// ── Full refresh application logic ──
//
// Applies a complete printer list from the print server and prunes the
// side state of printers that disappeared.

use chrono::Utc;
use tracing::debug;

use super::FleetStore;
use crate::model::Printer;

impl FleetStore {
    /// Replace the full printer list.
    ///
    /// Uses upsert-then-prune so subscribers never observe an empty list
    /// mid-refresh. View pointers, file buckets and selection entries for
    /// printers absent from `printers` are dropped; pointers to surviving
    /// printers resolve to the refreshed records.
    pub fn upsert_all(&self, printers: Vec<Printer>) {
        let items = printers.into_iter().map(|p| (p.id.clone(), p)).collect();
        let stale = self.printers.replace_all(items);

        let live = self.printers.ids();
        self.view.retain(&live);
        self.files.retain(&live);
        self.selection.retain(&live);

        self.last_full_refresh.send_replace(Some(Utc::now()));
        debug!(
            printers = live.len(),
            pruned = stale.len(),
            "printer list refreshed"
        );
    }
}
