//! HashKeyedMap: values stored under a key computed from the value itself.
//!
//! Every entry satisfies `key == projection(value)`. The container computes
//! the key on insert and never hands out mutable access to a stored value,
//! so the only ways to break the invariant are a projection that is not a
//! pure function or a store passed to [`HashKeyedMap::with_map`] that was
//! already inconsistent. [`HashKeyedMap::validate`] checks the invariant on
//! demand; it is not run on reads.
//!
//! Duplicate keys follow the store's unique-key rule: a second insert under
//! an existing key reports `inserted = false` and leaves the stored value as
//! it was.

use crate::error::InsertError;
use crate::map::{Entries, Map, MapCursor};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Computes the key a value is stored under.
///
/// Must be deterministic: equal values always project to equal keys.
/// Implemented for every `Fn(&V) -> K`.
pub trait Projection<V: ?Sized> {
    type Key;

    fn project(&self, value: &V) -> Self::Key;
}

impl<V: ?Sized, K, F> Projection<V> for F
where
    F: Fn(&V) -> K,
{
    type Key = K;

    #[inline]
    fn project(&self, value: &V) -> K {
        self(value)
    }
}

/// Default projection: the value's `Hash` run through a `BuildHasher`.
///
/// The hasher state is part of the projection, so two containers only agree
/// on keys if they share a hasher that hashes deterministically.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = RandomState> {
    hasher: S,
}

impl StdHash {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> StdHash<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<V, S> Projection<V> for StdHash<S>
where
    V: Hash + ?Sized,
    S: BuildHasher,
{
    type Key = u64;

    #[inline]
    fn project(&self, value: &V) -> u64 {
        self.hasher.hash_one(value)
    }
}

#[derive(Clone)]
pub struct HashKeyedMap<M, P = StdHash> {
    map: M,
    projection: P,
}

impl<M, P> HashKeyedMap<M, P>
where
    M: Map,
    P: Projection<M::Value, Key = M::Key>,
{
    pub fn new(projection: P) -> Self
    where
        M: Default,
    {
        Self::with_map(M::default(), projection)
    }

    /// Wrap an existing store. Entries already in it are taken as they are;
    /// use [`validate`](Self::validate) to check them.
    pub fn with_map(map: M, projection: P) -> Self {
        Self { map, projection }
    }

    /// Store `value` under its projected key.
    ///
    /// Returns a cursor to the entry now stored under that key and whether
    /// `value` was added. When the key was already present the existing
    /// entry is kept unchanged and `value` is dropped.
    pub fn insert(&mut self, value: M::Value) -> (MapCursor<&M>, bool) {
        let key = self.projection.project(&value);
        let (pos, inserted) = self.map.insert(key, value);
        if !inserted {
            log::trace!("hash-keyed insert: key already present, existing entry kept");
        }
        (MapCursor::new(&self.map, Some(pos)), inserted)
    }

    /// Cursor to the entry under `key`; the end cursor when absent.
    pub fn find(&self, key: &M::Key) -> MapCursor<&M> {
        MapCursor::new(&self.map, self.map.find(key))
    }

    pub fn get(&self, key: &M::Key) -> Option<&M::Value> {
        let pos = self.map.find(key)?;
        self.map.entry_at(&pos).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &M::Key) -> bool {
        self.map.find(key).is_some()
    }

    /// Cursor to the entry stored under `value`'s projection. Any value
    /// with the same key lands there, not only an equal one.
    pub fn find_value(&self, value: &M::Value) -> MapCursor<&M> {
        self.find(&self.projection.project(value))
    }

    /// Remove the entry under `key`. Returns the number removed (0 or 1).
    pub fn erase(&mut self, key: &M::Key) -> usize {
        let removed = self.map.erase(key);
        if removed > 0 {
            log::trace!("hash-keyed erase: removed {removed} entry");
        }
        removed
    }

    /// Remove the entry stored under `value`'s projection.
    pub fn erase_value(&mut self, value: &M::Value) -> usize {
        let key = self.projection.project(value);
        self.erase(&key)
    }

    /// Replace the value under `key` with `f(old)`, moving it to the key
    /// the new value projects to.
    ///
    /// Returns `Ok(false)` if `key` is absent. If the new key belongs to
    /// another entry the container is left untouched and
    /// `InsertError::DuplicateKey` is returned.
    pub fn update<F>(&mut self, key: &M::Key, f: F) -> Result<bool, InsertError>
    where
        F: FnOnce(&M::Value) -> M::Value,
        M::Key: PartialEq,
    {
        let Some(current) = self.get(key) else {
            return Ok(false);
        };
        let value = f(current);
        let new_key = self.projection.project(&value);
        if new_key != *key && self.contains_key(&new_key) {
            log::debug!("hash-keyed update rejected: new key belongs to another entry");
            return Err(InsertError::DuplicateKey);
        }
        self.map.remove(key);
        self.map.insert(new_key, value);
        Ok(true)
    }

    pub fn begin(&self) -> MapCursor<&M> {
        MapCursor::begin(&self.map)
    }

    pub fn end(&self) -> MapCursor<&M> {
        MapCursor::end(&self.map)
    }

    /// Entries as `(key, value)` in the store's native order.
    pub fn iter(&self) -> Entries<'_, M> {
        Entries::new(&self.map)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Recompute every key from its value. Logs a warning for each entry
    /// that disagrees and returns whether all agreed.
    pub fn validate(&self) -> bool
    where
        M::Key: PartialEq,
    {
        let mut consistent = true;
        for (index, (key, value)) in self.iter().enumerate() {
            if self.projection.project(value) != *key {
                log::warn!("hash-keyed entry #{index} is stored under a key its value does not project to");
                consistent = false;
            }
        }
        consistent
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Read-only access to the store.
    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn into_inner(self) -> M {
        self.map
    }
}

impl<M, P> Default for HashKeyedMap<M, P>
where
    M: Map + Default,
    P: Projection<M::Value, Key = M::Key> + Default,
{
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<M, P> Extend<M::Value> for HashKeyedMap<M, P>
where
    M: Map,
    P: Projection<M::Value, Key = M::Key>,
{
    fn extend<T: IntoIterator<Item = M::Value>>(&mut self, iter: T) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

impl<M, P> FromIterator<M::Value> for HashKeyedMap<M, P>
where
    M: Map + Default,
    P: Projection<M::Value, Key = M::Key> + Default,
{
    fn from_iter<T: IntoIterator<Item = M::Value>>(iter: T) -> Self {
        let mut out = Self::default();
        out.extend(iter);
        out
    }
}

impl<M, P> fmt::Debug for HashKeyedMap<M, P>
where
    M: Map,
    M::Key: fmt::Debug,
    M::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(Entries::new(&self.map)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexed_hash_map::IndexedHashMap;
    use crate::map::Cursor;
    use std::collections::BTreeMap;

    fn first_byte(s: &String) -> u8 {
        s.as_bytes().first().copied().unwrap_or(0)
    }

    fn words() -> HashKeyedMap<BTreeMap<u8, String>, fn(&String) -> u8> {
        HashKeyedMap::new(first_byte as fn(&String) -> u8)
    }

    /// Invariant: the stored key is always the projection of the value.
    #[test]
    fn insert_stores_under_projection() {
        let mut m = words();
        let (cur, inserted) = m.insert("koala".to_string());
        assert!(inserted);
        assert_eq!(cur.entry(), Some((&b'k', &"koala".to_string())));
        assert_eq!(m.get(&b'k').map(String::as_str), Some("koala"));
        assert!(m.validate());
    }

    /// Invariant: a second insert under the same key keeps the first value.
    #[test]
    fn colliding_insert_keeps_existing_value() {
        let mut m = words();
        assert!(m.insert("kiwi".to_string()).1);
        let (cur, inserted) = m.insert("kangaroo".to_string());
        assert!(!inserted);
        assert_eq!(cur.entry().map(|(_, v)| v.as_str()), Some("kiwi"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn value_lookups_go_through_the_projection() {
        let mut m = words();
        m.insert("kiwi".to_string());
        m.insert("owl".to_string());
        let cur = m.find_value(&"kangaroo".to_string());
        assert_eq!(cur.entry().map(|(_, v)| v.as_str()), Some("kiwi"));
        assert!(m.find_value(&"zebra".to_string()).is_end());
        assert_eq!(m.erase_value(&"zebra".to_string()), 0);
        assert_eq!(m.erase_value(&"kangaroo".to_string()), 1);
        assert_eq!(m.len(), 1);
        assert!(!m.contains_key(&b'k'));
    }

    #[test]
    fn update_rekeys_entry() {
        let mut m = words();
        m.extend(["cat".to_string(), "dog".to_string()]);

        assert_eq!(m.update(&b'c', |_| "bat".to_string()), Ok(true));
        assert!(!m.contains_key(&b'c'));
        assert_eq!(m.get(&b'b').map(String::as_str), Some("bat"));

        assert_eq!(m.update(&b'b', |_| "bison".to_string()), Ok(true));
        assert_eq!(m.get(&b'b').map(String::as_str), Some("bison"));
        assert_eq!(m.update(&b'z', |_| unreachable!()), Ok(false));
        assert!(m.validate());
    }

    /// Invariant: an update that would land on another entry's key changes
    /// nothing.
    #[test]
    fn update_onto_taken_key_is_rejected() {
        let mut m = words();
        m.extend(["cat".to_string(), "dog".to_string()]);
        assert_eq!(
            m.update(&b'c', |_| "duck".to_string()),
            Err(InsertError::DuplicateKey)
        );
        assert_eq!(m.get(&b'c').map(String::as_str), Some("cat"));
        assert_eq!(m.get(&b'd').map(String::as_str), Some("dog"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn validate_flags_inconsistent_store() {
        let mut raw = BTreeMap::new();
        raw.insert(b'a', "apple".to_string());
        raw.insert(b'x', "banana".to_string());
        let m = HashKeyedMap::with_map(raw, first_byte as fn(&String) -> u8);
        assert!(!m.validate());
        assert_eq!(m.get(&b'x').map(String::as_str), Some("banana"));
    }

    #[test]
    fn std_hash_over_indexed_store() {
        let mut m: HashKeyedMap<IndexedHashMap<u64, &str>> = HashKeyedMap::default();
        let (_, inserted) = m.insert("left");
        assert!(inserted);
        m.insert("right");
        assert!(!m.insert("left").1);
        assert_eq!(m.len(), 2);

        let key = m.projection().project("right");
        assert_eq!(m.get(&key), Some(&"right"));
        assert!(m.validate());

        let order: Vec<&str> = m.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, vec!["left", "right"]);
        assert_eq!(m.erase(&key), 1);
        assert_eq!(m.erase(&key), 0);
    }

    #[test]
    fn collect_and_clear() {
        let m: HashKeyedMap<BTreeMap<u64, u32>> = (0..10u32).chain(0..5).collect();
        assert_eq!(m.len(), 10);
        assert!(m.find(&m.projection().project(&3u32)).entry().is_some());
        let mut m = m;
        m.clear();
        assert!(m.is_empty());
        assert!(m.begin() == m.end());
    }
}
