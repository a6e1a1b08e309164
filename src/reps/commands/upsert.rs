use super::{record_delta, CmdMessage, CmdResult};
use crate::error::{RepsError, Result};
use crate::model::{Delta, Familiarity, Importance};
use crate::scheduler::Scheduler;
use crate::store::{ReviewStore, StorageBackend};
use tracing::info;

#[derive(Debug, Clone)]
pub struct UpsertInput {
    pub url: String,
    pub note: String,
    /// For a new item, how familiar it already is; for a known one, the review grade.
    pub familiarity: Familiarity,
    pub importance: Importance,
}

/// Tracks a new url, or records a review of an already tracked one.
///
/// For a known url a non-empty note replaces the stored one and the given
/// importance is applied before rescheduling.
pub fn run<B: StorageBackend>(
    store: &ReviewStore<B>,
    scheduler: &Scheduler,
    input: UpsertInput,
) -> Result<CmdResult> {
    let _tx = store.lock();

    let mut items = (*store.load_store()?).clone();
    let now = scheduler.clock().now();

    let (item, delta) = match items.id_for_url(&input.url) {
        Some(id) => {
            let old = items
                .get(id)
                .cloned()
                .ok_or_else(|| {
                    RepsError::Store(format!("url index points at missing item {}", id))
                })?;
            let mut item = old.clone();
            if !input.note.trim().is_empty() {
                item.note = input.note;
            }
            item.importance = input.importance;
            scheduler.schedule(&mut item, input.familiarity)?;
            (item.clone(), Delta::update(old, item, now))
        }
        None => {
            let item = scheduler.schedule_new(
                items.next_id(),
                &input.url,
                &input.note,
                input.familiarity,
                input.importance,
            )?;
            (item.clone(), Delta::add(item, now))
        }
    };

    items.put(item.clone());
    store.save_store(items)?;

    let verb = if delta.old_state.is_some() {
        "Reviewed"
    } else {
        "Added"
    };
    info!(
        id = item.id,
        url = %item.url,
        next_review = %item.next_review,
        "{}",
        verb.to_lowercase()
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} #{}: next review on {}",
        verb, item.id, item.next_review
    )));
    result.affected_items.push(item);
    record_delta(store, delta, &mut result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::Fixture;
    use crate::model::DeltaAction;

    const A: &str = "https://x.dev/a";

    fn input(url: &str, familiarity: Familiarity, importance: Importance) -> UpsertInput {
        UpsertInput {
            url: url.to_string(),
            note: String::new(),
            familiarity,
            importance,
        }
    }

    #[test]
    fn new_url_gets_next_id_and_add_delta() {
        let fx = Fixture::default();
        let first = run(&fx.store, &fx.scheduler, input(A, Familiarity::Medium, Importance::High))
            .unwrap();
        let second = run(
            &fx.store,
            &fx.scheduler,
            input("https://x.dev/b", Familiarity::Easy, Importance::Low),
        )
        .unwrap();

        assert_eq!(first.affected_items[0].id, 1);
        assert_eq!(second.affected_items[0].id, 2);

        let items = fx.store.load_store().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.max_id, 2);
        assert_eq!(items.id_for_url("https://x.dev/b"), Some(2));

        let deltas = fx.store.load_deltas().unwrap();
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[1].action, DeltaAction::Add);
        assert!(deltas[1].old_state.is_none());
        assert_eq!(deltas[1].new_state.as_ref().unwrap().id, 2);
    }

    #[test]
    fn known_url_is_reviewed_in_place() {
        let fx = Fixture::default();
        run(&fx.store, &fx.scheduler, input(A, Familiarity::Medium, Importance::High)).unwrap();

        fx.clock.advance_days(5);
        let mut review = input(A, Familiarity::Easy, Importance::Critical);
        review.note = "two pointers".to_string();
        let result = run(&fx.store, &fx.scheduler, review).unwrap();

        let item = &result.affected_items[0];
        assert_eq!(item.id, 1);
        assert_eq!(item.review_count, 2);
        assert_eq!(item.importance, Importance::Critical);
        assert_eq!(item.familiarity, Familiarity::Easy);
        assert_eq!(item.note, "two pointers");

        let items = fx.store.load_store().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.note_trie().search_prefix("poi").len(), 1);

        let deltas = fx.store.load_deltas().unwrap();
        let last = deltas.last().unwrap();
        assert_eq!(last.action, DeltaAction::Update);
        assert_eq!(last.old_state.as_ref().unwrap().review_count, 1);
        assert_eq!(last.new_state.as_ref().unwrap().review_count, 2);
    }

    #[test]
    fn empty_note_keeps_existing_note() {
        let fx = Fixture::default();
        let mut add = input(A, Familiarity::Medium, Importance::High);
        add.note = "sliding window".to_string();
        run(&fx.store, &fx.scheduler, add).unwrap();

        let result =
            run(&fx.store, &fx.scheduler, input(A, Familiarity::Hard, Importance::High)).unwrap();
        assert_eq!(result.affected_items[0].note, "sliding window");
    }

    #[test]
    fn store_save_failure_aborts_without_delta() {
        let fx = Fixture::default();
        fx.store.backend().set_fail_store_writes(true);

        let result =
            run(&fx.store, &fx.scheduler, input(A, Familiarity::Medium, Importance::High));
        assert!(result.is_err());
        assert!(fx.store.load_store().unwrap().is_empty());
        assert!(fx.store.load_deltas().unwrap().is_empty());
    }

    #[test]
    fn delta_save_failure_is_a_warning() {
        let fx = Fixture::default();
        fx.store.backend().set_fail_delta_writes(true);

        let result =
            run(&fx.store, &fx.scheduler, input(A, Familiarity::Medium, Importance::High)).unwrap();
        assert!(result.has_warnings());
        assert_eq!(fx.store.load_store().unwrap().len(), 1);
        assert!(fx.store.load_deltas().unwrap().is_empty());
    }
}
