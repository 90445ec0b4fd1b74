use serde::{Deserialize, Serialize};

use super::position::Vec2;
use crate::ecs::time::SimTime;

/// What kind of event a citizen remembers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryKind {
    PlayerSighting,
    Noise,
    Light,
    SocialInteraction,
    Threat,
    UnusualEvent,
    DangerousEvent,
}

/// A decaying, importance-weighted record of a perceived event.
///
/// Importance (0–1) sets both the retention priority under capacity
/// pressure and how long the entry survives before expiring.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub kind: MemoryKind,
    pub location: Vec2,
    pub timestamp: SimTime,
    pub importance: f32,
    pub description: String,
}

impl MemoryEntry {
    pub fn new(
        kind: MemoryKind,
        location: Vec2,
        timestamp: SimTime,
        importance: f32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location,
            timestamp,
            importance: importance.clamp(0.0, 1.0),
            description: description.into(),
        }
    }

    /// Seconds this entry survives: `base_decay * (0.5 + importance)`.
    /// Higher-importance memories persist proportionally longer.
    pub fn decay_time_secs(&self, base_decay_secs: f64) -> f64 {
        base_decay_secs * (0.5 + f64::from(self.importance))
    }

    pub fn is_expired(&self, now: SimTime, base_decay_secs: f64) -> bool {
        now.elapsed_since(self.timestamp) > self.decay_time_secs(base_decay_secs)
    }
}

/// Bounded, priority-ordered store of remembered events for one citizen.
///
/// Holds at most `capacity` entries. When a new entry would exceed
/// capacity, the lowest-importance entry is evicted first, ties broken
/// oldest-first.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<MemoryEntry>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, evicting the lowest-importance (ties: oldest)
    /// entry if the store is at capacity. The new entry itself competes:
    /// if it is the weakest of all candidates it is the one dropped.
    pub fn remember(&mut self, entry: MemoryEntry) {
        self.entries.push(entry);
        while self.entries.len() > self.capacity {
            let weakest = self
                .entries
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.importance
                        .total_cmp(&b.importance)
                        .then(a.timestamp.cmp(&b.timestamp))
                })
                .map(|(i, _)| i);
            match weakest {
                Some(i) => {
                    self.entries.remove(i);
                }
                None => break,
            }
        }
    }

    /// Drop every expired entry. Idempotent at a fixed `now`.
    pub fn forget_expired(&mut self, now: SimTime, base_decay_secs: f64) {
        self.entries
            .retain(|e| !e.is_expired(now, base_decay_secs));
    }

    /// Unexpired entries, most important first, optionally filtered by kind.
    pub fn relevant(
        &self,
        kind: Option<MemoryKind>,
        now: SimTime,
        base_decay_secs: f64,
    ) -> Vec<&MemoryEntry> {
        let mut hits: Vec<&MemoryEntry> = self
            .entries
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .filter(|e| !e.is_expired(now, base_decay_secs))
            .collect();
        hits.sort_by(|a, b| {
            b.importance
                .total_cmp(&a.importance)
                .then(b.timestamp.cmp(&a.timestamp))
        });
        hits
    }

    /// The single most important unexpired entry, if any.
    pub fn most_important(&self, now: SimTime, base_decay_secs: f64) -> Option<&MemoryEntry> {
        self.relevant(None, now, base_decay_secs).into_iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::time::TICKS_PER_SECOND;

    fn entry(importance: f32, tick: u64) -> MemoryEntry {
        MemoryEntry::new(
            MemoryKind::Noise,
            Vec2::ZERO,
            SimTime::from_ticks(tick),
            importance,
            "test",
        )
    }

    #[test]
    fn capacity_evicts_lowest_importance() {
        let mut store = MemoryStore::new(3);
        store.remember(entry(0.5, 0));
        store.remember(entry(0.2, 1));
        store.remember(entry(0.9, 2));
        store.remember(entry(0.7, 3));
        assert_eq!(store.len(), 3);
        assert!(
            store.iter().all(|e| e.importance != 0.2),
            "lowest-importance entry should be evicted"
        );
    }

    #[test]
    fn eviction_ties_break_oldest_first() {
        let mut store = MemoryStore::new(2);
        store.remember(entry(0.5, 0));
        store.remember(entry(0.5, 10));
        store.remember(entry(0.5, 20));
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|e| e.timestamp != SimTime::from_ticks(0)));
    }

    #[test]
    fn new_weak_entry_can_be_the_eviction_victim() {
        let mut store = MemoryStore::new(2);
        store.remember(entry(0.8, 0));
        store.remember(entry(0.9, 1));
        store.remember(entry(0.1, 2));
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|e| e.importance >= 0.8));
    }

    #[test]
    fn decay_time_scales_with_importance() {
        let low = entry(0.0, 0);
        let high = entry(1.0, 0);
        assert_eq!(low.decay_time_secs(60.0), 30.0);
        assert_eq!(high.decay_time_secs(60.0), 90.0);
    }

    #[test]
    fn forget_expired_is_idempotent() {
        let mut store = MemoryStore::new(8);
        store.remember(entry(0.0, 0));
        store.remember(entry(1.0, 0));
        // 40 s later: the 0.0-importance entry (30 s lifetime) is gone,
        // the 1.0-importance entry (90 s lifetime) remains.
        let now = SimTime::from_ticks(40 * TICKS_PER_SECOND);
        store.forget_expired(now, 60.0);
        let after_first: Vec<_> = store.iter().cloned().collect();
        store.forget_expired(now, 60.0);
        let after_second: Vec<_> = store.iter().cloned().collect();
        assert_eq!(after_first, after_second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn relevant_filters_by_kind_and_sorts_by_importance() {
        let now = SimTime::from_ticks(0);
        let mut store = MemoryStore::new(8);
        store.remember(entry(0.3, 0));
        store.remember(MemoryEntry::new(
            MemoryKind::Threat,
            Vec2::ZERO,
            now,
            0.9,
            "threat",
        ));
        store.remember(entry(0.6, 0));

        let noises = store.relevant(Some(MemoryKind::Noise), now, 60.0);
        assert_eq!(noises.len(), 2);
        assert_eq!(noises[0].importance, 0.6);

        let top = store.most_important(now, 60.0).unwrap();
        assert_eq!(top.kind, MemoryKind::Threat);
    }

    #[test]
    fn importance_is_clamped() {
        let e = entry(3.0, 0);
        assert_eq!(e.importance, 1.0);
        let e = entry(-1.0, 0);
        assert_eq!(e.importance, 0.0);
    }
}
