//! IndexedHashMap: unordered store with dense, index-addressed entries.
//!
//! Entries live contiguously in a `Vec`; a `hashbrown::HashTable<usize>`
//! maps hashes to entry indices. Positions are plain indices, which makes
//! cursor steps O(1). Removal swaps the last entry into the hole, so
//! removing moves at most one other entry and iteration order is the dense
//! order (insertion order until the first removal).

use crate::error::InsertError;
use crate::map::Map;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table::{Entry, HashTable};
use std::collections::hash_map::RandomState;

#[derive(Debug, Clone)]
struct Bucket<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct IndexedHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<usize>,
    entries: Vec<Bucket<K, V>>,
    reentrancy: DebugReentrancy,
}

impl<K, V> IndexedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for IndexedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in dense order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Bucket<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|b| (&b.key, &b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over entries with mutable values. Keys stay immutable.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Bucket<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|b| (&b.key, &mut b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> IndexedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            entries: Vec::new(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry holding `q`, if any.
    pub fn get_index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let entries = &self.entries;
        self.index
            .find(hash, |&i| entries[i].key.borrow() == q)
            .copied()
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_index_of(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.get_index_of(q)?;
        Some(&self.entries[i].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.get_index_of(q)?;
        Some(&mut self.entries[i].value)
    }

    pub fn get_index(&self, i: usize) -> Option<(&K, &V)> {
        self.entries.get(i).map(|b| (&b.key, &b.value))
    }

    /// Insert unless the key is present. Returns the index of the entry
    /// holding the key and whether this call inserted it.
    pub fn insert_full(&mut self, key: K, value: V) -> (usize, bool) {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        let entries = &self.entries;
        match self.index.entry(
            hash,
            |&i| entries[i].key == key,
            |&i| entries[i].hash,
        ) {
            Entry::Occupied(e) => (*e.get(), false),
            Entry::Vacant(v) => {
                let i = self.entries.len();
                self.entries.push(Bucket { key, value, hash });
                let _ = v.insert(i);
                (i, true)
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> Result<usize, InsertError> {
        match self.insert_full(key, value) {
            (i, true) => Ok(i),
            (_, false) => Err(InsertError::DuplicateKey),
        }
    }

    /// Insert using a lazy value constructor; `default` only runs when the
    /// key is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> Result<usize, InsertError>
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        let entries = &self.entries;
        match self.index.entry(
            hash,
            |&i| entries[i].key == key,
            |&i| entries[i].hash,
        ) {
            Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            Entry::Vacant(v) => {
                let value = default();
                let i = self.entries.len();
                self.entries.push(Bucket { key, value, hash });
                let _ = v.insert(i);
                Ok(i)
            }
        }
    }

    /// Remove the entry holding `q`. The last entry takes its index.
    pub fn swap_remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        let entries = &self.entries;
        let i = match self
            .index
            .find_entry(hash, |&i| entries[i].key.borrow() == q)
        {
            Ok(slot) => slot.remove().0,
            Err(_) => return None,
        };

        let removed = self.entries.swap_remove(i);
        if i < self.entries.len() {
            // The former last entry now lives at `i`; repoint its slot.
            let last = self.entries.len();
            let moved_hash = self.entries[i].hash;
            if let Some(slot) = self.index.find_mut(moved_hash, |&j| j == last) {
                *slot = i;
            }
        }
        log::trace!("indexed map: removed entry {i}, {} left", self.entries.len());
        Some((removed.key, removed.value))
    }

    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.index.clear();
        self.entries.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        debug_assert!(
            !self.reentrancy.is_entered(),
            "iterating a store from inside its own K: Hash/Eq"
        );
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        debug_assert!(!self.reentrancy.is_entered());
        IterMut {
            it: self.entries.iter_mut(),
        }
    }
}

impl<K, V, S> Map for IndexedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;
    type Pos = usize;

    fn insert(&mut self, key: K, value: V) -> (usize, bool) {
        self.insert_full(key, value)
    }

    fn find(&self, key: &K) -> Option<usize> {
        self.get_index_of(key)
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.swap_remove(key)
    }

    fn first(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn successor(&self, pos: &usize) -> Option<usize> {
        let next = pos + 1;
        (next < self.entries.len()).then_some(next)
    }

    fn entry_at(&self, pos: &usize) -> Option<(&K, &V)> {
        self.get_index(*pos)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        IndexedHashMap::clear(self)
    }
}

impl<K, V, S> Extend<(K, V)> for IndexedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert_full(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for IndexedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}
