//! Thread-safe key/value cache shared by the index build phases.
//!
//! Many phase-1 tasks write to the same cache at once, each under its own
//! key. `DashMap` shards its locks, so writers to distinct keys never touch
//! each other's entries. Concurrent `put`s to the same key are last-writer-wins;
//! `put_unless` lets the caller pick the winner instead.

use std::hash::Hash;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Generic concurrent cache with snapshot views.
///
/// `keys()` and `values()` copy the contents at call time; later `put`s are
/// not reflected in a snapshot already taken.
#[derive(Debug)]
pub struct Cache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, V>,
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, cloning the stored value.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store a value, replacing whatever was stored under `key`.
    ///
    /// Returns the previous value, if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Store a value unless `keep_current(current, &value)` says otherwise.
    ///
    /// The decision is made under the entry's lock, so racing writers to one
    /// key settle on the same winner whatever order they run in. Returns the
    /// losing value, if there was a contest.
    pub fn put_unless<F>(&self, key: K, value: V, keep_current: F) -> Option<V>
    where
        F: FnOnce(&V, &V) -> bool,
    {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                if keep_current(entry.get(), &value) {
                    Some(value)
                } else {
                    Some(entry.insert(value))
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Remove an entry, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Whether `key` currently has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot of all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of all values.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn reset(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn put_overwrites_previous_value() {
        let cache = Cache::new();
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("a", 2), Some(1));

        assert_eq!(cache.get(&"a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_unless_keeps_current_when_told_to() {
        let cache = Cache::new();
        assert_eq!(cache.put_unless("a", 5, |current, new| current < new), None);

        assert_eq!(cache.put_unless("a", 9, |current, new| current < new), Some(9));
        assert_eq!(cache.get(&"a"), Some(5));

        assert_eq!(cache.put_unless("a", 2, |current, new| current < new), Some(5));
        assert_eq!(cache.get(&"a"), Some(2));
    }

    #[test]
    fn racing_put_unless_settles_on_one_winner() {
        let cache = Cache::new();

        (0..1_000u32).into_par_iter().for_each(|i| {
            cache.put_unless("min", i, |current, new| current < new);
        });

        assert_eq!(cache.get(&"min"), Some(0));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let cache: Cache<String, u32> = Cache::new();
        assert_eq!(cache.get(&"missing".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn snapshots_do_not_follow_later_writes() {
        let cache = Cache::new();
        cache.put(1, "one");

        let keys = cache.keys();
        let values = cache.values();
        cache.put(2, "two");

        assert_eq!(keys, vec![1]);
        assert_eq!(values, vec!["one"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn remove_returns_stored_value() {
        let cache = Cache::new();
        cache.put("a", 1);

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn reset_drops_all_entries() {
        let cache = Cache::new();
        cache.put("x", 1);
        cache.put("y", 2);

        cache.reset();

        assert!(cache.is_empty());
        assert!(!cache.contains_key(&"x"));
    }

    #[test]
    fn concurrent_puts_to_distinct_keys_are_all_kept() {
        let cache = Cache::new();

        (0..10_000u32).into_par_iter().for_each(|i| {
            cache.put(i, i * 2);
        });

        assert_eq!(cache.len(), 10_000);
        let mut keys = cache.keys();
        keys.sort_unstable();
        assert_eq!(keys, (0..10_000).collect::<Vec<_>>());
        assert_eq!(cache.get(&4_321), Some(8_642));
    }
}
