//! Size- and age-bounded cache shared across request handlers.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Timed<V> {
    stored_at: Instant,
    value: V,
}

/// Concurrent map whose entries expire after `ttl` and whose size is capped at
/// `max_entries` by evicting the oldest entries first.
#[derive(Debug)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, Timed<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Fresh value for `key`, dropping it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            // The read guard must be released before removing the entry.
            let entry = self.entries.get(key)?;
            if entry.stored_at.elapsed() <= self.ttl {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        if self.max_entries == 0 {
            return;
        }
        self.entries.insert(
            key,
            Timed {
                stored_at: Instant::now(),
                value,
            },
        );
        if self.entries.len() > self.max_entries {
            self.prune();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove expired entries, then the oldest ones until under the cap.
    pub fn prune(&self) {
        let mut stamps: Vec<(K, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stored_at))
            .collect();

        for (key, stored_at) in &stamps {
            if stored_at.elapsed() > self.ttl {
                self.entries.remove(key);
            }
        }

        if self.entries.len() <= self.max_entries {
            return;
        }

        stamps.sort_by_key(|(_, stored_at)| *stored_at);
        for (key, _) in stamps {
            if self.entries.len() <= self.max_entries {
                break;
            }
            self.entries.remove(&key);
        }
    }
}
