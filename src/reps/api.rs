//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! reps operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs**: `"12"` or `"https://..."` become an [`ItemRef`],
//!   missing limits fall back to the configured `top_k`
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no terminal I/O and no formatting.
//!
//! ## Generic Over StorageBackend
//!
//! `ReviewApi<B: StorageBackend>`:
//! - Production: `ReviewApi<FsBackend>`
//! - Testing: `ReviewApi<MemBackend>`
//!
//! Every method takes `&self`. Writers serialize on the store's transaction
//! lock, so one `ReviewApi` can be shared behind an `Arc` across threads.

use crate::clock::Clock;
use crate::commands;
use crate::config::RepsConfig;
use crate::error::{RepsError, Result};
use crate::model::{Familiarity, Importance, ItemRef};
use crate::scheduler::Scheduler;
use crate::store::{ReviewStore, StorageBackend};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::search::SearchField;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, RankedItem};

pub struct ReviewApi<B: StorageBackend> {
    store: ReviewStore<B>,
    scheduler: Scheduler,
    config: RepsConfig,
    config_dir: Option<PathBuf>,
}

impl<B: StorageBackend> ReviewApi<B> {
    pub fn new(backend: B, config: &RepsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: ReviewStore::new(backend, config),
            scheduler: Scheduler::new(clock),
            config: config.clone(),
            config_dir: None,
        }
    }

    /// Where the `config` operation reads and writes `config.json`.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &ReviewStore<B> {
        &self.store
    }

    pub fn config(&self) -> &RepsConfig {
        &self.config
    }

    /// The scheduler's current date.
    pub fn today(&self) -> NaiveDate {
        self.scheduler.today()
    }

    /// Tracks `url`, or reviews it if it is already tracked.
    pub fn upsert(
        &self,
        url: &str,
        note: &str,
        familiarity: Familiarity,
        importance: Importance,
    ) -> Result<CmdResult> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RepsError::InvalidInput("url cannot be empty".to_string()));
        }
        let input = commands::upsert::UpsertInput {
            url: url.to_string(),
            note: note.trim().to_string(),
            familiarity,
            importance,
        };
        commands::upsert::run(&self.store, &self.scheduler, input)
    }

    pub fn delete(&self, target: &str) -> Result<CmdResult> {
        let target = parse_ref(target)?;
        commands::delete::run(&self.store, &self.scheduler, &target)
    }

    pub fn undo(&self) -> Result<CmdResult> {
        commands::undo::run(&self.store)
    }

    pub fn show(&self, target: &str) -> Result<CmdResult> {
        let target = parse_ref(target)?;
        commands::show::run(&self.store, &target)
    }

    pub fn search(&self, query: &str, field: SearchField) -> Result<CmdResult> {
        commands::search::run(&self.store, &self.scheduler, query, field, self.config.top_k)
    }

    pub fn top(&self, k: Option<usize>) -> Result<CmdResult> {
        commands::top::run(&self.store, &self.scheduler, k.unwrap_or(self.config.top_k))
    }

    pub fn next(&self) -> Result<CmdResult> {
        commands::top::next(&self.store, &self.scheduler)
    }

    pub fn summary(&self) -> Result<CmdResult> {
        commands::summary::run(&self.store, &self.scheduler, self.config.top_k)
    }

    pub fn configure(&self, action: ConfigAction) -> Result<CmdResult> {
        let dir = self
            .config_dir
            .as_deref()
            .ok_or_else(|| RepsError::Config("no config directory set".to_string()))?;
        commands::config::run(dir, action)
    }
}

fn parse_ref(input: &str) -> Result<ItemRef> {
    input
        .parse::<ItemRef>()
        .map_err(RepsError::InvalidInput)
}
