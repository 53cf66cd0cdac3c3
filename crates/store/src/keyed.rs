//! Single-record-per-key store

use std::collections::HashMap;
use std::hash::Hash;

/// Keyed map with default-on-miss reads
#[derive(Debug, Clone)]
pub struct KeyedStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for KeyedStore<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> KeyedStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, or `V::default()` if absent
    pub fn get(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Stored value, distinguishing absence from the zero value
    pub fn find(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite, returning the previous value
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Read-modify-write starting from the default when absent
    pub fn update<F>(&mut self, key: K, f: F) -> &V
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        let entry = self.entries.entry(key).or_default();
        f(entry);
        entry
    }

    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}
