//! Sharded concurrent map backing all per-actor state.
//!
//! Keys hash to one of N independently locked shards so triggers for
//! different actors rarely contend. Every compound operation (check then
//! insert, read-modify-write) runs under a single shard write lock.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, RandomState};

use parking_lot::RwLock;

pub struct ShardedMap<K, V> {
    shards: Box<[RwLock<HashMap<K, V>>]>,
    hasher: RandomState,
}

impl<K, V> ShardedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, key: &K) -> &RwLock<HashMap<K, V>> {
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    /// Returns the stored value, creating it with `init` on first access.
    ///
    /// Concurrent first accesses for one key create exactly one value.
    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        let shard = self.shard(&key);
        if let Some(value) = shard.read().get(&key) {
            return value.clone();
        }
        shard.write().entry(key).or_insert_with(init).clone()
    }

    /// Mutates the value in place, creating it with `init` if absent.
    pub fn update<R>(
        &self,
        key: K,
        init: impl FnOnce() -> V,
        apply: impl FnOnce(&mut V) -> R,
    ) -> R {
        let mut shard = self.shard(&key).write();
        apply(shard.entry(key).or_insert_with(init))
    }

    /// Inserts only if the key is absent. Returns whether it inserted.
    pub fn try_insert(&self, key: K, value: V) -> bool {
        let mut shard = self.shard(&key).write();
        if shard.contains_key(&key) {
            return false;
        }
        shard.insert(key, value);
        true
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.shard(key).read().contains_key(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).write().remove(key)
    }

    /// Removes the entry only while `predicate` holds for its value.
    pub fn remove_if(&self, key: &K, predicate: impl FnOnce(&V) -> bool) -> bool {
        let mut shard = self.shard(key).write();
        match shard.get(key) {
            Some(value) if predicate(value) => {
                shard.remove(key);
                true
            }
            _ => false,
        }
    }

    pub fn retain(&self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        for shard in self.shards.iter() {
            shard.write().retain(|key, value| keep(key, value));
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn get_or_insert_is_lazy_and_sticky() {
        let map = ShardedMap::new(4);
        assert_eq!(map.get_or_insert_with("a", || 1), 1);
        assert_eq!(map.get_or_insert_with("a", || 2), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn try_insert_refuses_existing_keys() {
        let map = ShardedMap::new(2);
        assert!(map.try_insert(1, "first"));
        assert!(!map.try_insert(1, "second"));
        assert_eq!(map.get(&1), Some("first"));
    }

    #[test]
    fn remove_if_checks_value() {
        let map = ShardedMap::new(2);
        map.try_insert(1, 10);
        assert!(!map.remove_if(&1, |v| *v == 11));
        assert!(map.remove_if(&1, |v| *v == 10));
        assert!(map.is_empty());
    }

    #[test]
    fn zero_shards_still_works() {
        let map = ShardedMap::new(0);
        map.update("k", || 0, |v| *v += 5);
        assert_eq!(map.get(&"k"), Some(5));
    }

    #[test]
    fn concurrent_first_access_creates_one_value() {
        let map = Arc::new(ShardedMap::new(8));
        let created = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = Arc::clone(&map);
                let created = Arc::clone(&created);
                std::thread::spawn(move || {
                    map.get_or_insert_with(42u64, || {
                        created.fetch_add(1, Ordering::SeqCst);
                        Arc::new(())
                    })
                })
            })
            .collect();

        let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
