//! # Scheduler
//!
//! Adaptive spaced repetition. Each item carries an ease factor that scales the
//! gap between reviews; the gap grows by that factor after every successful
//! review and resets to a base interval when the item is failed.
//!
//! Importance sets the starting point (more important items start with a lower
//! ease and a shorter first interval) and feeds a per-review bonus, while the
//! review grade feeds a penalty. Both tables are indexed by the enum's rank, so
//! every variant has exactly one entry.
//!
//! ## Invariants
//!
//! - `ease_factor` stays in `[MIN_EASE, MAX_EASE]` across any sequence of reviews.
//! - Every computed interval is in `[MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS]`.
//! - `next_review >= last_reviewed`.

use crate::clock::{add_days, days_between, Clock};
use crate::error::Result;
use crate::model::{Familiarity, Importance, ReviewItem};
use chrono::NaiveDate;
use std::sync::Arc;

pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 2.6;
pub const MIN_INTERVAL_DAYS: i64 = 1;
pub const MAX_INTERVAL_DAYS: i64 = 90;

const INITIAL_EASE: [f64; 4] = [2.0, 1.9, 1.8, 1.7];
const BASE_INTERVAL_DAYS: [i64; 4] = [8, 6, 5, 4];
const IMPORTANCE_BONUS: [f64; 4] = [0.15, 0.10, 0.05, 0.03];
const FAMILIARITY_PENALTY: [f64; 5] = [0.40, 0.25, 0.10, 0.00, -0.05];

const OVERDUE_GRACE_DAYS: i64 = 3;
const OVERDUE_PENALTY_PER_DAY: f64 = 0.01;
const OVERDUE_PENALTY_CAP: f64 = 0.1;

const STABILITY_MIN_REVIEWS: u32 = 3;
const STABILITY_BONUS_SHARE: f64 = 0.5;

// Priority weights. Only their signs matter for ordering guarantees.
const IMPORTANCE_WEIGHT: f64 = 3.0;
const OVERDUE_WEIGHT: f64 = 1.0;
const FAMILIARITY_WEIGHT: f64 = 2.0;
const EASE_WEIGHT: f64 = 4.0;
const OVERDUE_FLOOR_DAYS: i64 = -30;
const OVERDUE_CEIL_DAYS: i64 = 180;

pub fn initial_ease(importance: Importance) -> f64 {
    INITIAL_EASE[importance.rank()]
}

pub fn base_interval(importance: Importance) -> i64 {
    BASE_INTERVAL_DAYS[importance.rank()]
}

fn clamp_interval(days: i64) -> i64 {
    days.clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
}

fn clamp_ease(ease: f64) -> f64 {
    ease.clamp(MIN_EASE, MAX_EASE)
}

/// First interval for a newly tracked item.
pub fn initial_interval(importance: Importance, familiarity: Familiarity) -> i64 {
    let adjust = match familiarity {
        Familiarity::VeryHard => -1,
        Familiarity::Easy => 2,
        Familiarity::VeryEasy => 3,
        Familiarity::Hard | Familiarity::Medium => 0,
    };
    clamp_interval(base_interval(importance) + adjust)
}

/// Ease after a review graded `grade`; `review_count` already includes it.
pub fn adjust_ease(
    ease: f64,
    importance: Importance,
    grade: Familiarity,
    review_count: u32,
) -> f64 {
    let bonus = IMPORTANCE_BONUS[importance.rank()];
    let mut ease = ease + bonus - FAMILIARITY_PENALTY[grade.rank()];
    if review_count >= STABILITY_MIN_REVIEWS && grade >= Familiarity::Medium {
        ease += STABILITY_BONUS_SHARE * bonus;
    }
    clamp_ease(ease)
}

/// Ease lost for reviewing an item late. Zero inside the grace period, for
/// low-importance items, and for perfect recalls.
pub fn overdue_penalty(overdue_days: i64, importance: Importance, grade: Familiarity) -> f64 {
    if overdue_days <= OVERDUE_GRACE_DAYS
        || importance == Importance::Low
        || grade == Familiarity::VeryEasy
    {
        return 0.0;
    }
    ((overdue_days - OVERDUE_GRACE_DAYS) as f64 * OVERDUE_PENALTY_PER_DAY).min(OVERDUE_PENALTY_CAP)
}

/// Display urgency of an item on `today`; higher is more urgent.
///
/// Non-decreasing in importance and days overdue, non-increasing in
/// familiarity and ease factor.
pub fn priority_score(item: &ReviewItem, today: NaiveDate) -> f64 {
    let overdue =
        days_between(item.next_review, today).clamp(OVERDUE_FLOOR_DAYS, OVERDUE_CEIL_DAYS);
    let unfamiliarity = (Familiarity::VeryEasy.rank() - item.familiarity.rank()) as f64;

    IMPORTANCE_WEIGHT * (item.importance.rank() + 1) as f64
        + OVERDUE_WEIGHT * overdue as f64
        + FAMILIARITY_WEIGHT * unfamiliarity
        + EASE_WEIGHT * (MAX_EASE - clamp_ease(item.ease_factor))
}

pub struct Scheduler {
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn schedule_new(
        &self,
        id: u64,
        url: &str,
        note: &str,
        familiarity: Familiarity,
        importance: Importance,
    ) -> Result<ReviewItem> {
        let today = self.today();
        Ok(ReviewItem {
            id,
            url: url.to_string(),
            note: note.to_string(),
            familiarity,
            importance,
            ease_factor: initial_ease(importance),
            review_count: 1,
            last_reviewed: today,
            next_review: add_days(today, initial_interval(importance, familiarity))?,
            created_at: today,
        })
    }

    /// Records a review graded `grade` and moves the item's next review date.
    ///
    /// On error `item` is left unchanged.
    pub fn schedule(&self, item: &mut ReviewItem, grade: Familiarity) -> Result<()> {
        let today = self.today();

        if grade == Familiarity::VeryHard {
            let next_review = add_days(today, base_interval(item.importance))?;
            item.review_count = item.review_count.saturating_add(1);
            item.ease_factor =
                adjust_ease(item.ease_factor, item.importance, grade, item.review_count);
            item.last_reviewed = today;
            item.next_review = next_review;
            item.familiarity = grade;
            return Ok(());
        }

        let overdue_days = days_between(item.next_review, today);
        let penalty = overdue_penalty(overdue_days, item.importance, grade);
        let mut ease = item.ease_factor;
        if penalty > 0.0 {
            ease = clamp_ease(ease - penalty);
        }

        let mut previous = days_between(item.last_reviewed, item.next_review);
        if previous < 1 {
            previous = base_interval(item.importance);
        }
        let interval = clamp_interval((previous as f64 * ease).round() as i64);
        let next_review = add_days(today, interval)?;

        item.review_count = item.review_count.saturating_add(1);
        item.ease_factor = adjust_ease(ease, item.importance, grade, item.review_count);
        item.last_reviewed = today;
        item.next_review = next_review;
        item.familiarity = grade;
        Ok(())
    }

    pub fn priority_score(&self, item: &ReviewItem) -> f64 {
        priority_score(item, self.today())
    }
}
