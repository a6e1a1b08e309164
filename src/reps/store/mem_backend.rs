use super::StorageBackend;
use crate::error::{RepsError, Result};
use crate::model::{Delta, ItemStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory storage backend for testing.
///
/// Documents round-trip through JSON so tests see exactly what a file would
/// hold. Writes can be made to fail per document.
#[derive(Default)]
pub struct MemBackend {
    items: Mutex<Option<String>>,
    deltas: Mutex<Option<String>>,
    fail_store_writes: AtomicBool,
    fail_delta_writes: AtomicBool,
    store_loads: AtomicUsize,
    delta_loads: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every item-store save fail until switched off.
    pub fn set_fail_store_writes(&self, fail: bool) {
        self.fail_store_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every delta-log save fail until switched off.
    pub fn set_fail_delta_writes(&self, fail: bool) {
        self.fail_delta_writes.store(fail, Ordering::SeqCst);
    }

    /// How many times the item store was read from "disk".
    pub fn store_loads(&self) -> usize {
        self.store_loads.load(Ordering::SeqCst)
    }

    pub fn delta_loads(&self) -> usize {
        self.delta_loads.load(Ordering::SeqCst)
    }

    /// Raw persisted delta log, bypassing any cache.
    pub fn persisted_deltas(&self) -> Result<Vec<Delta>> {
        match self.deltas.lock().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the persisted delta log, e.g. with a corrupt entry.
    pub fn put_raw_deltas(&self, json: &str) {
        *self.deltas.lock() = Some(json.to_string());
    }
}

impl StorageBackend for MemBackend {
    fn load_store(&self) -> Result<Option<ItemStore>> {
        self.store_loads.fetch_add(1, Ordering::SeqCst);
        match self.items.lock().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save_store(&self, store: &ItemStore) -> Result<()> {
        if self.fail_store_writes.load(Ordering::SeqCst) {
            return Err(RepsError::Store("Simulated write error".to_string()));
        }
        let json = serde_json::to_string(store)?;
        *self.items.lock() = Some(json);
        Ok(())
    }

    fn load_deltas(&self) -> Result<Vec<Delta>> {
        self.delta_loads.fetch_add(1, Ordering::SeqCst);
        self.persisted_deltas()
    }

    fn save_deltas(&self, deltas: &[Delta]) -> Result<()> {
        if self.fail_delta_writes.load(Ordering::SeqCst) {
            return Err(RepsError::Store("Simulated write error".to_string()));
        }
        let json = serde_json::to_string(deltas)?;
        *self.deltas.lock() = Some(json);
        Ok(())
    }
}
