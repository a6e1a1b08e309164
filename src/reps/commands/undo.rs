use super::{CmdMessage, CmdResult};
use crate::error::{RepsError, Result};
use crate::model::{Delta, DeltaAction, ItemStore, ReviewItem};
use crate::store::{ReviewStore, StorageBackend};
use tracing::{info, warn};

/// Reverts the most recent recorded change and drops it from the log.
///
/// The delta is validated before anything is touched: a malformed entry is
/// reported as [`RepsError::CorruptDelta`], one that no longer matches the
/// current items as [`RepsError::UndoConflict`], and either way it is left in
/// place. If saving the reverted store fails the log is left unchanged too.
pub fn run<B: StorageBackend>(store: &ReviewStore<B>) -> Result<CmdResult> {
    let _tx = store.lock();

    let mut deltas = (*store.load_deltas()?).clone();
    let index = match deltas.len().checked_sub(1) {
        Some(index) => index,
        None => return Err(RepsError::NothingToUndo),
    };
    let delta = &deltas[index];

    let mut items = (*store.load_store()?).clone();
    let restored = revert(&mut items, delta, index)?;
    store.save_store(items)?;

    let action = delta.action;
    let item_id = delta.item_id;
    info!(item_id, ?action, "undone");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Undid {} of #{}",
        describe(action),
        item_id
    )));
    result.affected_items.push(restored);

    deltas.pop();
    if let Err(e) = store.save_deltas(deltas) {
        warn!(item_id, error = %e, "undo applied but delta log could not be updated");
        result.add_message(CmdMessage::warning(format!(
            "Undo applied, but the undo log could not be updated: {}",
            e
        )));
    }
    Ok(result)
}

fn describe(action: DeltaAction) -> &'static str {
    match action {
        DeltaAction::Add => "add",
        DeltaAction::Update => "review",
        DeltaAction::Delete => "delete",
    }
}

/// Applies the inverse of `delta` to `items`, returning the affected item as
/// it was before the change (for an add, as it was when added).
///
/// A malformed delta is [`RepsError::CorruptDelta`]; a well-formed one that no
/// longer fits the current items is [`RepsError::UndoConflict`].
fn revert(items: &mut ItemStore, delta: &Delta, index: usize) -> Result<ReviewItem> {
    let corrupt = |reason| RepsError::CorruptDelta { index, reason };
    match delta.action {
        DeltaAction::Add => {
            let added = snapshot(delta, &delta.new_state, "new_state").map_err(corrupt)?;
            if items.id_for_url(&added.url) != Some(added.id) {
                return Err(RepsError::UndoConflict(format!(
                    "item #{} ({}) is no longer tracked",
                    added.id, added.url
                )));
            }
            items.remove(added.id).ok_or_else(|| {
                RepsError::UndoConflict(format!("item #{} is no longer tracked", added.id))
            })?;
            Ok(added)
        }
        DeltaAction::Update => {
            snapshot(delta, &delta.new_state, "new_state").map_err(corrupt)?;
            let old = snapshot(delta, &delta.old_state, "old_state").map_err(corrupt)?;
            restore(items, old)
        }
        DeltaAction::Delete => {
            let old = snapshot(delta, &delta.old_state, "old_state").map_err(corrupt)?;
            restore(items, old)
        }
    }
}

/// The snapshot must be present and describe the delta's own item.
fn snapshot(
    delta: &Delta,
    state: &Option<ReviewItem>,
    name: &str,
) -> std::result::Result<ReviewItem, String> {
    let item = state
        .clone()
        .ok_or_else(|| format!("{:?} delta has no {}", delta.action, name))?;
    if item.id != delta.item_id {
        return Err(format!(
            "{} is for item {} but the delta is for item {}",
            name, item.id, delta.item_id
        ));
    }
    Ok(item)
}

fn restore(items: &mut ItemStore, old: ReviewItem) -> Result<ReviewItem> {
    if let Some(owner) = items.id_for_url(&old.url) {
        if owner != old.id {
            return Err(RepsError::UndoConflict(format!(
                "url {} is now tracked as item #{}",
                old.url, owner
            )));
        }
    }
    items.put(old.clone());
    Ok(old)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::commands::delete;
    use crate::commands::fixtures::Fixture;
    use crate::model::{Familiarity, Importance, ItemRef};

    #[test]
    fn empty_log_has_nothing_to_undo() {
        let fx = Fixture::default();
        assert!(matches!(run(&fx.store), Err(RepsError::NothingToUndo)));
    }

    #[test]
    fn undo_add_removes_item_but_keeps_max_id() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "dp", Familiarity::Medium, Importance::High);

        let result = run(&fx.store).unwrap();
        assert_eq!(result.affected_items[0].id, 1);

        let items = fx.store.load_store().unwrap();
        assert!(items.is_empty());
        assert_eq!(items.max_id, 1);
        assert!(items.note_trie().is_empty());
        assert!(fx.store.load_deltas().unwrap().is_empty());

        let next = fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        assert_eq!(next.id, 2);
    }

    #[test]
    fn undo_review_restores_previous_state() {
        let fx = Fixture::default();
        let original =
            fx.add("https://x.dev/a", "dynamic", Familiarity::Medium, Importance::High);
        fx.clock.advance_days(5);
        fx.add("https://x.dev/a", "knapsack", Familiarity::Easy, Importance::Low);

        run(&fx.store).unwrap();

        let items = fx.store.load_store().unwrap();
        assert_eq!(items.get(1), Some(&original));
        assert_eq!(items.note_trie().search_prefix("dyn").len(), 1);
        assert!(items.note_trie().search_prefix("kna").is_empty());
        assert_eq!(fx.store.load_deltas().unwrap().len(), 1);
    }

    #[test]
    fn undo_delete_restores_item_and_indexes() {
        let fx = Fixture::default();
        let original = fx.add("https://x.dev/lru", "cache", Familiarity::Hard, Importance::High);
        delete::run(&fx.store, &fx.scheduler, &ItemRef::Id(1)).unwrap();

        let result = run(&fx.store).unwrap();
        assert!(result.messages[0].content.contains("delete"));

        let items = fx.store.load_store().unwrap();
        assert_eq!(items.get(1), Some(&original));
        assert_eq!(items.id_for_url("https://x.dev/lru"), Some(1));
        assert_eq!(items.url_trie().search_prefix("lru").len(), 1);
        assert_eq!(items.note_trie().search_prefix("cac").len(), 1);
    }

    #[test]
    fn undo_beyond_window_fails() {
        let fx = Fixture::with_window(1);
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        fx.add("https://x.dev/b", "", Familiarity::Medium, Importance::High);

        run(&fx.store).unwrap();
        assert!(matches!(run(&fx.store), Err(RepsError::NothingToUndo)));
        assert_eq!(fx.store.load_store().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_delta_is_reported_and_kept() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);

        let raw = r#"[{
            "action": "update",
            "question_id": 1,
            "old_state": null,
            "new_state": null,
            "created_at": "2024-01-01T00:00:00Z"
        }]"#;
        fx.store.backend().put_raw_deltas(raw);
        fx.store.invalidate();

        let err = run(&fx.store).unwrap_err();
        assert!(matches!(err, RepsError::CorruptDelta { index: 0, .. }));
        assert_eq!(fx.store.load_deltas().unwrap().len(), 1);
        assert_eq!(fx.store.load_store().unwrap().len(), 1);
    }

    #[test]
    fn snapshot_for_another_item_is_corrupt() {
        let fx = Fixture::default();
        let item = fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        let mut delta = Delta::add(item, fx.clock.now());
        delta.item_id = 7;
        fx.store
            .backend()
            .put_raw_deltas(&serde_json::to_string(&vec![delta]).unwrap());
        fx.store.invalidate();

        assert!(matches!(run(&fx.store), Err(RepsError::CorruptDelta { .. })));
    }

    #[test]
    fn undo_add_of_item_already_gone_is_refused() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        fx.store.backend().set_fail_delta_writes(true);
        let deleted = delete::run(&fx.store, &fx.scheduler, &ItemRef::Id(1)).unwrap();
        assert!(deleted.has_warnings());
        fx.store.backend().set_fail_delta_writes(false);

        let err = run(&fx.store).unwrap_err();
        assert!(matches!(err, RepsError::UndoConflict(_)));
        assert!(err.to_string().contains("#1"));
        let deltas = fx.store.load_deltas().unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].action, DeltaAction::Add);
        assert!(fx.store.load_store().unwrap().is_empty());
    }

    #[test]
    fn restoring_url_owned_by_another_item_is_a_conflict() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        delete::run(&fx.store, &fx.scheduler, &ItemRef::Id(1)).unwrap();
        fx.store.backend().set_fail_delta_writes(true);
        fx.add("https://x.dev/a", "", Familiarity::Easy, Importance::Low);
        fx.store.backend().set_fail_delta_writes(false);

        let err = run(&fx.store).unwrap_err();
        assert!(matches!(err, RepsError::UndoConflict(_)));
        assert_eq!(fx.store.load_deltas().unwrap().len(), 2);
        let items = fx.store.load_store().unwrap();
        assert_eq!(items.id_for_url("https://x.dev/a"), Some(2));
        assert!(items.get(1).is_none());
    }

    #[test]
    fn failed_store_save_leaves_log_alone() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        fx.store.backend().set_fail_store_writes(true);

        assert!(run(&fx.store).is_err());
        assert_eq!(fx.store.load_deltas().unwrap().len(), 1);
        assert_eq!(fx.store.load_store().unwrap().len(), 1);
    }

    #[test]
    fn failed_log_save_is_a_warning() {
        let fx = Fixture::default();
        fx.add("https://x.dev/a", "", Familiarity::Medium, Importance::High);
        fx.store.backend().set_fail_delta_writes(true);

        let result = run(&fx.store).unwrap();
        assert!(result.has_warnings());
        assert!(fx.store.load_store().unwrap().is_empty());
    }
}
