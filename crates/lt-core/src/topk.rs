//! Bounded frequency table with first-seen tie-breaking.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Distinct keys tracked per output slot before pruning kicks in.
const SLOTS_PER_RANK: usize = 64;

/// Lower bound on tracked keys regardless of K.
const MIN_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: u64,
    first_seen: u64,
}

/// Counts keys and ranks the top K.
///
/// Counts are exact while the number of distinct keys stays within the
/// tracking capacity. Past it the table keeps its strongest half and drops
/// the rest, so memory stays bounded on unbounded key spaces.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    k: usize,
    capacity: usize,
    next_seq: u64,
    slots: HashMap<K, Slot>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            capacity: (k.saturating_mul(SLOTS_PER_RANK)).max(MIN_CAPACITY),
            next_seq: 0,
            slots: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    fn add_count(&mut self, key: K, count: u64) {
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.count += count;
            return;
        }
        let first_seen = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(key, Slot { count, first_seen });
        if self.slots.len() > self.capacity {
            self.prune();
        }
    }

    fn prune(&mut self) {
        let keep = self.capacity / 2;
        let mut ranked: Vec<(K, Slot)> = self.slots.drain().collect();
        if keep < ranked.len() {
            ranked.select_nth_unstable_by(keep, |(_, a), (_, b)| rank_order(a, b));
            ranked.truncate(keep);
        }
        tracing::trace!(kept = keep, "frequency table pruned");
        self.slots = ranked.into_iter().collect();
    }

    /// Fold another table into this one. Keys new to `self` are ordered after
    /// every key it already holds, in `other`'s first-seen order.
    pub fn merge(&mut self, other: FrequencyTable<K>) {
        let mut incoming: Vec<(K, Slot)> = other.slots.into_iter().collect();
        incoming.sort_by_key(|(_, slot)| slot.first_seen);
        for (key, slot) in incoming {
            self.add_count(key, slot.count);
        }
    }

    /// Top K keys: count descending, earlier first-seen first on ties.
    pub fn top(&self) -> Vec<(K, u64)> {
        self.ranked(self.k)
    }

    /// Every tracked key in ranking order.
    pub fn ranked_all(&self) -> Vec<(K, u64)> {
        self.ranked(usize::MAX)
    }

    fn ranked(&self, limit: usize) -> Vec<(K, u64)> {
        let mut ranked: Vec<(K, Slot)> = self
            .slots
            .iter()
            .map(|(k, slot)| (k.clone(), *slot))
            .collect();
        sort_ranked(&mut ranked);
        ranked
            .into_iter()
            .take(limit)
            .map(|(k, slot)| (k, slot.count))
            .collect()
    }

    pub fn count(&self, key: &K) -> Option<u64> {
        self.slots.get(key).map(|slot| slot.count)
    }

    /// Number of distinct keys currently tracked.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of tracked counts.
    pub fn total(&self) -> u64 {
        self.slots.values().map(|slot| slot.count).sum()
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

/// Count descending, then first-seen ascending.
fn rank_order(a: &Slot, b: &Slot) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.first_seen.cmp(&b.first_seen))
}

fn sort_ranked<K>(ranked: &mut [(K, Slot)]) {
    ranked.sort_by(|(_, a), (_, b)| rank_order(a, b));
}
