use super::{record_delta, CmdMessage, CmdResult};
use crate::error::{RepsError, Result};
use crate::model::{Delta, ItemRef};
use crate::scheduler::Scheduler;
use crate::store::{ReviewStore, StorageBackend};
use tracing::info;

/// Stops tracking an item. Its id is never handed out again.
pub fn run<B: StorageBackend>(
    store: &ReviewStore<B>,
    scheduler: &Scheduler,
    target: &ItemRef,
) -> Result<CmdResult> {
    let _tx = store.lock();

    let mut items = (*store.load_store()?).clone();
    let id = items
        .resolve(target)
        .map(|item| item.id)
        .ok_or_else(|| RepsError::NotFound(target.to_string()))?;
    let removed = items
        .remove(id)
        .ok_or_else(|| RepsError::NotFound(target.to_string()))?;

    store.save_store(items)?;
    info!(id, url = %removed.url, "deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted #{}: {}",
        removed.id, removed.url
    )));
    result.affected_items.push(removed.clone());
    record_delta(store, Delta::delete(removed, scheduler.clock().now()), &mut result);
    Ok(result)
}
