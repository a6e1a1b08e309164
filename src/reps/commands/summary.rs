use super::top::ranked;
use super::CmdResult;
use crate::error::Result;
use crate::model::{Familiarity, Importance, ItemStore};
use crate::scheduler::Scheduler;
use crate::store::{ReviewStore, StorageBackend};
use chrono::NaiveDate;
use serde::Serialize;

/// Collection-wide counts as of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    /// Next review today or earlier.
    pub due: usize,
    /// Next review strictly before today.
    pub overdue: usize,
    pub by_importance: Vec<(Importance, usize)>,
    pub by_familiarity: Vec<(Familiarity, usize)>,
    pub mean_ease: Option<f64>,
    pub undo_depth: usize,
    pub undo_window: usize,
}

impl Summary {
    pub fn compute(
        items: &ItemStore,
        today: NaiveDate,
        undo_depth: usize,
        undo_window: usize,
    ) -> Self {
        let mut by_importance: Vec<(Importance, usize)> =
            Importance::ALL.iter().map(|i| (*i, 0)).collect();
        let mut by_familiarity: Vec<(Familiarity, usize)> =
            Familiarity::ALL.iter().map(|f| (*f, 0)).collect();
        let mut due = 0;
        let mut overdue = 0;
        let mut ease_sum = 0.0;

        for item in items.items() {
            if item.is_due(today) {
                due += 1;
            }
            if item.is_overdue(today) {
                overdue += 1;
            }
            by_importance[item.importance.rank()].1 += 1;
            by_familiarity[item.familiarity.rank()].1 += 1;
            ease_sum += item.ease_factor;
        }

        let total = items.len();
        Self {
            total,
            due,
            overdue,
            by_importance,
            by_familiarity,
            mean_ease: (total > 0).then(|| ease_sum / total as f64),
            undo_depth,
            undo_window,
        }
    }
}

/// Counts plus the `k` most urgent items.
pub fn run<B: StorageBackend>(
    store: &ReviewStore<B>,
    scheduler: &Scheduler,
    k: usize,
) -> Result<CmdResult> {
    let items = store.load_store()?;
    let deltas = store.load_deltas()?;
    let today = scheduler.today();

    let summary = Summary::compute(&items, today, deltas.len(), store.max_deltas());
    let mut result = CmdResult::default().with_listed_items(ranked(&items, today, k));
    result.summary = Some(summary);
    Ok(result)
}
