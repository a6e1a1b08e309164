use super::StorageBackend;
use crate::config::RepsConfig;
use crate::error::Result;
use crate::model::{Delta, ItemStore};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use tracing::debug;

/// Held for the duration of one transaction; dropping it unlocks.
pub type TxGuard<'a> = MutexGuard<'a, ()>;

#[derive(Default)]
struct Cache {
    store: Option<Arc<ItemStore>>,
    deltas: Option<Arc<Vec<Delta>>>,
}

/// Cached, transactional access to the persisted item store and delta log.
///
/// Reads are served from the cache once a document has been loaded. A cached
/// document is only replaced after the backend has committed the new one, so
/// readers never observe state that failed to persist.
pub struct ReviewStore<B: StorageBackend> {
    backend: B,
    max_deltas: usize,
    min_prefix_len: usize,
    cache: RwLock<Cache>,
    tx_lock: Mutex<()>,
}

impl<B: StorageBackend> ReviewStore<B> {
    pub fn new(backend: B, config: &RepsConfig) -> Self {
        Self::with_limits(backend, config.max_deltas, config.min_prefix_len)
    }

    /// `max_deltas` is the undo window; `min_prefix_len` configures the tries.
    pub fn with_limits(backend: B, max_deltas: usize, min_prefix_len: usize) -> Self {
        Self {
            backend,
            max_deltas,
            min_prefix_len,
            cache: RwLock::new(Cache::default()),
            tx_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn max_deltas(&self) -> usize {
        self.max_deltas
    }

    /// Takes the coarse transaction lock. Single process only.
    pub fn lock(&self) -> TxGuard<'_> {
        self.tx_lock.lock()
    }

    /// Forget cached documents so the next read goes to the backend.
    pub fn invalidate(&self) {
        *self.cache.write() = Cache::default();
    }

    pub fn load_store(&self) -> Result<Arc<ItemStore>> {
        if let Some(store) = self.cache.read().store.clone() {
            return Ok(store);
        }

        let mut cache = self.cache.write();
        if let Some(store) = cache.store.clone() {
            return Ok(store);
        }

        let mut store = self
            .backend
            .load_store()?
            .unwrap_or_else(|| ItemStore::new(self.min_prefix_len));
        store.rebuild_search_index(self.min_prefix_len)?;
        debug!(items = store.len(), max_id = store.max_id, "loaded item store");

        let store = Arc::new(store);
        cache.store = Some(store.clone());
        Ok(store)
    }

    pub fn save_store(&self, store: ItemStore) -> Result<()> {
        self.backend.save_store(&store)?;
        self.cache.write().store = Some(Arc::new(store));
        Ok(())
    }

    pub fn load_deltas(&self) -> Result<Arc<Vec<Delta>>> {
        if let Some(deltas) = self.cache.read().deltas.clone() {
            return Ok(deltas);
        }

        let mut cache = self.cache.write();
        if let Some(deltas) = cache.deltas.clone() {
            return Ok(deltas);
        }

        let deltas = Arc::new(self.backend.load_deltas()?);
        debug!(deltas = deltas.len(), "loaded delta log");
        cache.deltas = Some(deltas.clone());
        Ok(deltas)
    }

    pub fn save_deltas(&self, deltas: Vec<Delta>) -> Result<()> {
        self.backend.save_deltas(&deltas)?;
        self.cache.write().deltas = Some(Arc::new(deltas));
        Ok(())
    }

    /// Appends to the delta log and persists it, dropping the oldest entries
    /// beyond the retention window.
    pub fn append_delta(&self, delta: Delta) -> Result<()> {
        let mut deltas = (*self.load_deltas()?).clone();
        deltas.push(delta);
        trim_to_window(&mut deltas, self.max_deltas);
        self.save_deltas(deltas)
    }
}

/// Keeps only the newest `max` entries.
pub fn trim_to_window(deltas: &mut Vec<Delta>, max: usize) {
    if deltas.len() > max {
        let excess = deltas.len() - max;
        deltas.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Familiarity, Importance, ReviewItem};
    use crate::store::mem_backend::MemBackend;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn item(id: u64) -> ReviewItem {
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        ReviewItem {
            id,
            url: format!("https://x.dev/{}", id),
            note: String::new(),
            familiarity: Familiarity::Hard,
            importance: Importance::Medium,
            ease_factor: 1.9,
            review_count: 1,
            last_reviewed: day,
            next_review: day,
            created_at: day,
        }
    }

    fn delta(id: u64) -> Delta {
        Delta::add(item(id), Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn empty_backend_loads_empty_store() {
        let store = ReviewStore::with_limits(MemBackend::new(), 5, 3);
        let loaded = store.load_store().unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.max_id, 0);
        assert!(store.load_deltas().unwrap().is_empty());
    }

    #[test]
    fn cache_hit_skips_backend() {
        let store = ReviewStore::with_limits(MemBackend::new(), 5, 3);
        store.load_store().unwrap();
        store.load_store().unwrap();
        store.load_deltas().unwrap();
        store.load_deltas().unwrap();
        assert_eq!(store.backend().store_loads(), 1);
        assert_eq!(store.backend().delta_loads(), 1);

        store.invalidate();
        store.load_store().unwrap();
        assert_eq!(store.backend().store_loads(), 2);
    }

    #[test]
    fn save_replaces_cache_only_on_success() {
        let store = ReviewStore::with_limits(MemBackend::new(), 5, 3);
        let mut next = (*store.load_store().unwrap()).clone();
        next.put(item(1));
        store.save_store(next.clone()).unwrap();
        assert_eq!(store.load_store().unwrap().len(), 1);

        store.backend().set_fail_store_writes(true);
        next.put(item(2));
        assert!(store.save_store(next).is_err());
        assert_eq!(store.load_store().unwrap().len(), 1);
    }

    #[test]
    fn saved_store_survives_cache_reset() {
        let store = ReviewStore::with_limits(MemBackend::new(), 5, 3);
        let mut next = (*store.load_store().unwrap()).clone();
        next.put(item(3));
        store.save_store(next).unwrap();

        store.invalidate();
        let reloaded = store.load_store().unwrap();
        assert_eq!(reloaded.get(3), Some(&item(3)));
        assert_eq!(reloaded.url_trie().search_prefix("x").len(), 0);
        assert_eq!(reloaded.url_trie().search_prefix("dev").len(), 1);
    }

    #[test]
    fn append_delta_keeps_a_sliding_window() {
        let store = ReviewStore::with_limits(MemBackend::new(), 3, 3);
        for id in 1..=5 {
            store.append_delta(delta(id)).unwrap();
        }
        let kept: Vec<u64> = store
            .load_deltas()
            .unwrap()
            .iter()
            .map(|d| d.item_id)
            .collect();
        assert_eq!(kept, vec![3, 4, 5]);
        assert_eq!(store.backend().persisted_deltas().unwrap().len(), 3);
    }

    #[test]
    fn trim_to_window_handles_short_logs() {
        let mut deltas = vec![delta(1)];
        trim_to_window(&mut deltas, 4);
        assert_eq!(deltas.len(), 1);
        trim_to_window(&mut deltas, 0);
        assert!(deltas.is_empty());
    }
}
