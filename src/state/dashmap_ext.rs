use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Read helpers for `DashMap` that never hand out a shard guard.
///
/// Dispatch runs handlers across `.await` points, so lookups copy the value
/// out and release the shard lock before returning.
pub trait DashMapExt<K, V> {
    /// Copy out the value stored under `key`.
    fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone;

    /// Point-in-time copy of every entry, ordered by key.
    fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone + Ord,
        V: Clone;
}

impl<K, V> DashMapExt<K, V> for DashMap<K, V>
where
    K: Eq + Hash,
{
    fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get(key).map(|entry| entry.value().clone())
    }

    fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone + Ord,
        V: Clone,
    {
        let mut entries: Vec<(K, V)> = self
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_sorted() {
        let map: DashMap<u64, &str> = DashMap::new();
        map.insert(3, "c");
        map.insert(1, "a");
        map.insert(2, "b");
        assert_eq!(map.snapshot(), vec![(1, "a"), (2, "b"), (3, "c")]);
        assert_eq!(map.get_cloned(&2), Some("b"));
        assert_eq!(map.get_cloned(&9), None);
    }
}
