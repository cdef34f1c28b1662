// ── Generic ordered entity collection ──
//
// Concurrent id-keyed storage with a sorted snapshot that is rebuilt and
// pushed to subscribers via `watch` on every mutation.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::EntityId;

/// A reactive collection of one entity type, one instance per id.
///
/// `DashMap` gives O(1) lookups; the snapshot is kept sorted by the
/// comparator supplied at construction, so every subscriber observes the
/// ordering invariant after each mutation.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    by_id: DashMap<EntityId, Arc<T>>,

    /// Sort order of the snapshot.
    order: fn(&T, &T) -> Ordering,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Sorted snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new(order: fn(&T, &T) -> Ordering) -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            order,
            version,
            snapshot,
        }
    }

    /// Insert or overwrite an entity. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, id: EntityId, entity: T) -> bool {
        let is_new = self.by_id.insert(id, Arc::new(entity)).is_none();
        self.rebuild_snapshot();
        self.bump_version();
        is_new
    }

    /// Overwrite an existing entity. Returns `false` (and changes nothing)
    /// when `id` is unknown.
    pub(crate) fn replace(&self, id: &EntityId, entity: T) -> bool {
        let Some(mut slot) = self.by_id.get_mut(id) else {
            return false;
        };
        *slot = Arc::new(entity);
        drop(slot);

        self.rebuild_snapshot();
        self.bump_version();
        true
    }

    /// Remove an entity by id. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = self.by_id.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    /// Replace the whole collection.
    ///
    /// Upserts every incoming entity, then prunes ids that were not in the
    /// incoming set, and publishes a single snapshot at the end. A later
    /// duplicate id overwrites an earlier one. Returns the pruned ids.
    pub(crate) fn replace_all(&self, items: Vec<(EntityId, T)>) -> Vec<EntityId> {
        let incoming: HashSet<EntityId> = items.iter().map(|(id, _)| id.clone()).collect();
        for (id, entity) in items {
            self.by_id.insert(id, Arc::new(entity));
        }

        let stale: Vec<EntityId> = self
            .by_id
            .iter()
            .filter(|r| !incoming.contains(r.key()))
            .map(|r| r.key().clone())
            .collect();
        for id in &stale {
            self.by_id.remove(id);
        }

        self.rebuild_snapshot();
        self.bump_version();
        stale
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Get the current sorted snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn ids(&self) -> HashSet<EntityId> {
        self.by_id.iter().map(|r| r.key().clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect, sort, and broadcast.
    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<T>> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        let order = self.order;
        values.sort_by(|a, b| order(a, b));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn strings() -> EntityCollection<String> {
        EntityCollection::new(Ord::cmp)
    }

    fn values(col: &EntityCollection<String>) -> Vec<String> {
        col.snapshot().iter().map(|s| (**s).clone()).collect()
    }

    #[test]
    fn upsert_returns_true_for_new_id() {
        let col = strings();
        assert!(col.upsert(EntityId::from("1"), "hello".into()));
        assert!(!col.upsert(EntityId::from("1"), "world".into()));
        assert_eq!(col.len(), 1);
        assert_eq!(*col.get(&EntityId::from("1")).unwrap(), "world");
    }

    #[test]
    fn snapshot_is_sorted_after_each_mutation() {
        let col = strings();
        col.upsert(EntityId::from("1"), "c".into());
        col.upsert(EntityId::from("2"), "a".into());
        col.upsert(EntityId::from("3"), "b".into());
        assert_eq!(values(&col), ["a", "b", "c"]);

        col.replace(&EntityId::from("2"), "z".into());
        assert_eq!(values(&col), ["b", "c", "z"]);
    }

    #[test]
    fn replace_unknown_id_is_noop() {
        let col = strings();
        col.upsert(EntityId::from("1"), "a".into());
        let before = col.version();

        assert!(!col.replace(&EntityId::from("9"), "x".into()));
        assert_eq!(col.version(), before);
        assert!(!col.contains(&EntityId::from("9")));
    }

    #[test]
    fn remove_returns_entity_once() {
        let col = strings();
        col.upsert(EntityId::from("1"), "a".into());
        assert_eq!(*col.remove(&EntityId::from("1")).unwrap(), "a");
        assert!(col.remove(&EntityId::from("1")).is_none());
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn replace_all_prunes_and_reports_stale_ids() {
        let col = strings();
        col.upsert(EntityId::from("1"), "a".into());
        col.upsert(EntityId::from("2"), "b".into());

        let stale = col.replace_all(vec![
            (EntityId::from("2"), "b2".into()),
            (EntityId::from("3"), "c".into()),
        ]);

        assert_eq!(stale, vec![EntityId::from("1")]);
        assert_eq!(values(&col), ["b2", "c"]);
    }

    #[test]
    fn replace_all_keeps_one_instance_per_id() {
        let col = strings();
        col.replace_all(vec![
            (EntityId::from("1"), "first".into()),
            (EntityId::from("1"), "second".into()),
        ]);
        assert_eq!(values(&col), ["second"]);
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let col = strings();
        let mut rx = col.subscribe();
        col.upsert(EntityId::from("1"), "a".into());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
