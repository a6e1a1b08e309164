//! # Storage Layer
//!
//! Two documents make up the persisted state:
//!
//! ```text
//! <data dir>/
//! ├── items.json     # { max_id, questions: {id: item}, url_index: {url: id} }
//! ├── deltas.json    # [ {action, question_id, old_state, new_state, created_at}, ... ]
//! └── config.json    # RepsConfig
//! ```
//!
//! Either file may be missing or empty; both mean "empty collection".
//!
//! ## Layers
//!
//! - [`StorageBackend`]: raw load/save of the two documents. It handles the
//!   "how" (filesystem vs memory) and nothing else.
//!   - [`fs_backend::FsBackend`]: JSON files, written atomically (temp file,
//!     flush, rename over the target).
//!   - [`mem_backend::MemBackend`]: in-memory, for tests, with switchable
//!     write failures.
//! - [`review_store::ReviewStore`]: the transactional store on top of a
//!   backend. It owns the read cache, the coarse transaction lock and the
//!   delta-log retention window.
//!
//! ## Locking
//!
//! The cache sits behind a reader/writer lock: many concurrent readers, one
//! writer replacing a cached document after a successful save. The coarse
//! transaction lock is separate and is held by a command across its whole
//! load → mutate → save sequence. Neither lock spans processes.

use crate::error::Result;
use crate::model::{Delta, ItemStore};

pub mod fs_backend;
pub mod mem_backend;
pub mod review_store;

pub use review_store::ReviewStore;

/// Abstract interface for raw document I/O.
pub trait StorageBackend: Send + Sync {
    /// Load the item store. `Ok(None)` when nothing has been saved yet.
    fn load_store(&self) -> Result<Option<ItemStore>>;

    /// Replace the persisted item store. MUST be atomic.
    fn save_store(&self, store: &ItemStore) -> Result<()>;

    /// Load the delta log, oldest first. Empty when nothing has been saved.
    fn load_deltas(&self) -> Result<Vec<Delta>>;

    /// Replace the persisted delta log. MUST be atomic.
    fn save_deltas(&self, deltas: &[Delta]) -> Result<()>;
}
