//! Process-wide memoization of values that are expensive to derive.
//!
//! Entries never expire. Writers invalidate exactly the keys they make stale,
//! and readers repopulate on miss. Every key carries a generation that `put`
//! and `invalidate` bump, so a reader that loaded from the store before a
//! concurrent write cannot put its outdated result back afterwards.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::entity::{subtask, user};

/// Cache key of the per-team, per-task aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamTaskKey {
    pub team_id: i32,
    pub task_id: i32,
}

impl TeamTaskKey {
    pub fn new(team_id: i32, task_id: i32) -> Self {
        Self { team_id, task_id }
    }
}

/// Version of a key observed before loading it from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    epoch: u64,
    generation: u64,
}

struct Slot<V> {
    generation: u64,
    value: Option<V>,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Self {
            generation: 0,
            value: None,
        }
    }
}

/// A concurrent map with atomic per-key reads and writes.
pub struct CacheMap<K, V> {
    slots: DashMap<K, Slot<V>>,
    /// Bumped by `clear`, which drops every slot and its generation.
    epoch: AtomicU64,
}

impl<K: Eq + Hash, V> Default for CacheMap<K, V> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
            epoch: AtomicU64::new(0),
        }
    }
}

impl<K, V> CacheMap<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    pub fn get(&self, key: &K) -> Option<V> {
        self.slots.get(key).and_then(|slot| slot.value.clone())
    }

    pub fn stamp(&self, key: &K) -> Stamp {
        Stamp {
            epoch: self.epoch.load(Ordering::Acquire),
            generation: self.slots.get(key).map_or(0, |slot| slot.generation),
        }
    }

    pub fn put(&self, key: K, value: V) {
        let mut slot = self.slots.entry(key).or_insert_with(Slot::empty);
        slot.generation += 1;
        slot.value = Some(value);
    }

    /// Store `value` only if nothing touched `key` since `stamp` was taken.
    pub fn put_if_current(&self, key: K, stamp: Stamp, value: V) -> bool {
        let mut slot = self.slots.entry(key).or_insert_with(Slot::empty);
        if self.epoch.load(Ordering::Acquire) != stamp.epoch || slot.generation != stamp.generation
        {
            return false;
        }
        slot.value = Some(value);
        true
    }

    pub fn invalidate(&self, key: &K) {
        let mut slot = self.slots.entry(*key).or_insert_with(Slot::empty);
        slot.generation += 1;
        slot.value = None;
    }

    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.slots.clear();
    }

    /// Read through the cache, running `load` on a miss.
    ///
    /// Load errors are returned as-is and nothing is cached for them.
    pub async fn get_or_try_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let stamp = self.stamp(&key);
        let value = load().await?;
        self.put_if_current(key, stamp, value.clone());
        Ok(value)
    }
}

/// Every derived value the read paths memoize.
///
/// Subtask lists, subtask maxima and users are immutable while a contest
/// runs. The two team/task maps are kept fresh by [`record_submission`].
///
/// [`record_submission`]: AggregateCache::record_submission
#[derive(Default)]
pub struct AggregateCache {
    pub subtasks: CacheMap<i32, Arc<Vec<subtask::Model>>>,
    pub subtask_max_score: CacheMap<i32, i32>,
    pub users: CacheMap<i32, user::Model>,
    pub team_task_score: CacheMap<TeamTaskKey, i32>,
    pub team_task_submitted: CacheMap<TeamTaskKey, bool>,
}

impl AggregateCache {
    /// Apply a committed submission: the pair has now submitted, and a
    /// matched answer may have raised its best-per-subtask score.
    pub fn record_submission(&self, key: TeamTaskKey, matched: bool) {
        self.team_task_submitted.put(key, true);
        if matched {
            self.team_task_score.invalidate(&key);
            debug!(
                team_id = key.team_id,
                task_id = key.task_id,
                "Invalidated cached team score"
            );
        }
    }

    pub fn clear(&self) {
        self.subtasks.clear();
        self.subtask_max_score.clear();
        self.users.clear();
        self.team_task_score.clear();
        self.team_task_submitted.clear();
    }
}
