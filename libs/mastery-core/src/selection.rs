//! Practice batch selection.
//!
//! Every selector returns at most `count` distinct IDs drawn from the
//! candidate pool, in the order they should be presented.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::priority::priority;
use crate::types::{MasteryRecord, PracticeMode};

/// Percentage of the post-due remainder reserved for unseen questions.
const NEW_ITEM_SHARE_PERCENT: usize = 30;

/// Select a batch under the given mode. Random mode uses the thread RNG.
pub fn select_batch(
    mode: PracticeMode,
    candidates: &[i64],
    mastery: &HashMap<i64, MasteryRecord>,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<i64> {
    match mode {
        PracticeMode::Smart => select_smart(candidates, mastery, count, now),
        PracticeMode::Cram => select_cram(candidates, mastery, count, now),
        PracticeMode::Random => select_random(candidates, count, &mut rand::thread_rng()),
    }
}

/// Pure priority rank: the `count` most urgent questions.
pub fn select_cram(
    candidates: &[i64],
    mastery: &HashMap<i64, MasteryRecord>,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<i64> {
    let pool = distinct(candidates);
    let count = count.min(pool.len());
    let mut ranked = rank(&pool, mastery, now);
    ranked.truncate(count);
    ranked
}

/// Due items first, then a bounded share of new items, then not-due filler,
/// then any remaining new items.
pub fn select_smart(
    candidates: &[i64],
    mastery: &HashMap<i64, MasteryRecord>,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<i64> {
    let pool = distinct(candidates);
    let count = count.min(pool.len());

    let is_new = |id: &i64| mastery.get(id).map_or(true, MasteryRecord::is_new);
    let is_due = |id: &i64| mastery.get(id).is_some_and(|r| r.is_due(now));

    let new_items: Vec<i64> = pool.iter().copied().filter(is_new).collect();
    let due: Vec<i64> = pool.iter().copied().filter(is_due).collect();
    let not_due: Vec<i64> = pool
        .iter()
        .copied()
        .filter(|id| !is_new(id) && !is_due(id))
        .collect();

    let due = rank(&due, mastery, now);
    let not_due = rank(&not_due, mastery, now);

    let mut selected: Vec<i64> = Vec::with_capacity(count);
    selected.extend(due.iter().take(count));

    let remaining = count - selected.len();
    let quota = new_item_quota(remaining).min(new_items.len());
    let (quota_new, leftover_new) = new_items.split_at(quota);
    selected.extend(quota_new);

    let remaining = count - selected.len();
    selected.extend(not_due.iter().take(remaining));

    let remaining = count - selected.len();
    selected.extend(leftover_new.iter().take(remaining));

    selected
}

/// Uniform shuffle of the pool, truncated to `count`.
pub fn select_random<R: Rng + ?Sized>(candidates: &[i64], count: usize, rng: &mut R) -> Vec<i64> {
    let mut pool = distinct(candidates);
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// `ceil(remaining * 30%)`, in integers so round numbers stay exact.
fn new_item_quota(remaining: usize) -> usize {
    remaining.saturating_mul(NEW_ITEM_SHARE_PERCENT).div_ceil(100)
}

/// Drop repeated IDs, keeping first occurrence order.
fn distinct(candidates: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Stable ascending sort by priority.
fn rank(ids: &[i64], mastery: &HashMap<i64, MasteryRecord>, now: DateTime<Utc>) -> Vec<i64> {
    let mut scored: Vec<(i64, f64)> = ids
        .iter()
        .map(|id| (*id, priority(mastery.get(id), now)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().map(|(id, _)| id).collect()
}
