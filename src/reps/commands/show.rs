use super::CmdResult;
use crate::error::{RepsError, Result};
use crate::model::ItemRef;
use crate::store::{ReviewStore, StorageBackend};

pub fn run<B: StorageBackend>(store: &ReviewStore<B>, target: &ItemRef) -> Result<CmdResult> {
    let items = store.load_store()?;
    let item = items
        .resolve(target)
        .cloned()
        .ok_or_else(|| RepsError::NotFound(target.to_string()))?;
    Ok(CmdResult::default().with_affected_items(vec![item]))
}
