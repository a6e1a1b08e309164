//! # Command Layer
//!
//! The business logic of reps. Each command lives in its own submodule as a
//! plain function over a [`ReviewStore`] (plus the
//! [`Scheduler`](crate::scheduler::Scheduler) where dates or
//! priorities are involved) and returns a structured [`CmdResult`].
//!
//! ## Transactions
//!
//! Mutating commands (`upsert`, `delete`, `undo`) are single logical
//! transactions. Each one:
//!
//! 1. takes the store's coarse lock,
//! 2. loads the cached item store and works on a private copy,
//! 3. saves the copy (an error here aborts with nothing committed),
//! 4. appends to (or, for undo, pops from) the delta log.
//!
//! A failure in step 4 is logged and reported as a warning; the change itself
//! stays committed and the undo log may lag one entry behind.
//!
//! Read-only commands (`search`, `top`, `summary`, `show`) skip the lock: they
//! read whatever document is cached, which is only ever replaced after a
//! successful save.
//!
//! ## Command Modules
//!
//! - [`upsert`]: Track a new problem or record a review of a known one
//! - [`delete`]: Stop tracking a problem
//! - [`undo`]: Revert the most recent change
//! - [`search`]: Prefix search over url and note tokens
//! - [`top`]: Most urgent problems, and the single next one
//! - [`summary`]: Counts and the most urgent problems
//! - [`show`]: One problem by id or url
//! - [`config`]: Read and write configuration

use crate::model::{Delta, ReviewItem};
use crate::store::{ReviewStore, StorageBackend};
use serde::Serialize;
use tracing::warn;

pub mod config;
pub mod delete;
pub mod search;
pub mod show;
pub mod summary;
pub mod top;
pub mod undo;
pub mod upsert;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An item together with the priority score it was ranked by.
#[derive(Debug, Clone, Serialize)]
pub struct RankedItem {
    pub item: ReviewItem,
    pub score: f64,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Items created, changed, removed or restored by the command.
    pub affected_items: Vec<ReviewItem>,
    /// Items to display, most urgent first.
    pub listed_items: Vec<RankedItem>,
    pub summary: Option<summary::Summary>,
    pub config: Option<crate::config::RepsConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_items(mut self, items: Vec<ReviewItem>) -> Self {
        self.affected_items = items;
        self
    }

    pub fn with_listed_items(mut self, items: Vec<RankedItem>) -> Self {
        self.listed_items = items;
        self
    }

    pub fn with_config(mut self, config: crate::config::RepsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Appends a delta after a committed change. Failure only costs undo history.
fn record_delta<B: StorageBackend>(store: &ReviewStore<B>, delta: Delta, result: &mut CmdResult) {
    let item_id = delta.item_id;
    if let Err(e) = store.append_delta(delta) {
        warn!(item_id, error = %e, "change saved but undo log could not be updated");
        result.add_message(CmdMessage::warning(format!(
            "Saved, but the undo log could not be updated: {}",
            e
        )));
    }
}
