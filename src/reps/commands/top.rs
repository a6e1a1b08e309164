use super::{CmdMessage, CmdResult, RankedItem};
use crate::error::{RepsError, Result};
use crate::model::ItemStore;
use crate::ranker::top_k_scored;
use crate::scheduler::{priority_score, Scheduler};
use crate::store::{ReviewStore, StorageBackend};
use chrono::NaiveDate;

/// The `k` most urgent items of the whole store. Ties keep id order.
pub fn ranked(items: &ItemStore, today: NaiveDate, k: usize) -> Vec<RankedItem> {
    top_k_scored(items.items(), k, |item| priority_score(item, today))
        .into_iter()
        .map(|hit| RankedItem {
            item: hit.value.clone(),
            score: hit.score,
        })
        .collect()
}

pub fn run<B: StorageBackend>(
    store: &ReviewStore<B>,
    scheduler: &Scheduler,
    k: usize,
) -> Result<CmdResult> {
    let items = store.load_store()?;
    let mut result = CmdResult::default();
    if items.is_empty() {
        result.add_message(CmdMessage::info("No items tracked yet"));
    }
    Ok(result.with_listed_items(ranked(&items, scheduler.today(), k)))
}

/// The single most urgent item.
pub fn next<B: StorageBackend>(store: &ReviewStore<B>, scheduler: &Scheduler) -> Result<CmdResult> {
    let items = store.load_store()?;
    let top = ranked(&items, scheduler.today(), 1);
    if top.is_empty() {
        return Err(RepsError::EmptyStore);
    }
    Ok(CmdResult::default().with_listed_items(top))
}
