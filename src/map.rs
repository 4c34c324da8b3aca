//! The contract every underlying store satisfies, and cursors over it.
//!
//! Adapters in this crate never reimplement storage; they drive a `Map`
//! through positions. A position is an opaque, comparable token naming one
//! stored entry. `None` stands for the past-the-end position, so `find`
//! misses and exhausted cursors compare equal to `end()`.

use core::ops::{Bound, Deref};
use std::collections::BTreeMap;

/// Unique-key associative store addressed by positions.
pub trait Map {
    type Key;
    type Value;
    /// Token naming an entry. Positions are invalidated by the store's own
    /// rules (any structural change may move them).
    type Pos: Clone + Eq;

    /// Insert `(key, value)` unless the key is present. Returns the
    /// position of the entry holding the key and whether it was inserted.
    /// An existing entry is never updated.
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> (Self::Pos, bool);

    fn find(&self, key: &Self::Key) -> Option<Self::Pos>;

    fn remove(&mut self, key: &Self::Key) -> Option<(Self::Key, Self::Value)>;

    /// Remove by key and report how many entries went away (0 or 1).
    fn erase(&mut self, key: &Self::Key) -> usize {
        usize::from(self.remove(key).is_some())
    }

    /// Position of the first entry in native iteration order.
    fn first(&self) -> Option<Self::Pos>;

    /// Position following `pos` in native iteration order.
    fn successor(&self, pos: &Self::Pos) -> Option<Self::Pos>;

    fn entry_at(&self, pos: &Self::Pos) -> Option<(&Self::Key, &Self::Value)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

impl<K, V> Map for BTreeMap<K, V>
where
    K: Ord + Clone,
{
    type Key = K;
    type Value = V;
    type Pos = K;

    fn insert(&mut self, key: K, value: V) -> (K, bool) {
        use std::collections::btree_map::Entry;
        match self.entry(key) {
            Entry::Occupied(e) => (e.key().clone(), false),
            Entry::Vacant(e) => {
                let pos = e.key().clone();
                e.insert(value);
                (pos, true)
            }
        }
    }

    fn find(&self, key: &K) -> Option<K> {
        self.get_key_value(key).map(|(k, _)| k.clone())
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        BTreeMap::remove_entry(self, key)
    }

    fn first(&self) -> Option<K> {
        self.keys().next().cloned()
    }

    fn successor(&self, pos: &K) -> Option<K> {
        self.range::<K, _>((Bound::Excluded(pos), Bound::Unbounded))
            .next()
            .map(|(k, _)| k.clone())
    }

    fn entry_at(&self, pos: &K) -> Option<(&K, &V)> {
        self.get_key_value(pos)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }
}

/// A position inside some container, comparable and steppable.
///
/// Equality is positional: two cursors are equal when they name the same
/// entry of the same container (or are both at the end of it).
pub trait Cursor: Clone + PartialEq {
    type Key;
    type Value;

    /// The entry under the cursor, `None` at the end.
    fn entry(&self) -> Option<(&Self::Key, &Self::Value)>;

    /// Step to the next entry. Advancing the end cursor leaves it at the end.
    fn advance(&mut self);

    fn is_end(&self) -> bool {
        self.entry().is_none()
    }
}

/// Cursor over any `Map` reachable through a cloneable reference `R`
/// (a plain `&M`, or a `RefCell` borrow guard for shared stores).
pub struct MapCursor<R>
where
    R: Deref,
    R::Target: Map,
{
    map: R,
    pos: Option<<R::Target as Map>::Pos>,
}

impl<R> MapCursor<R>
where
    R: Deref,
    R::Target: Map,
{
    pub fn new(map: R, pos: Option<<R::Target as Map>::Pos>) -> Self {
        Self { map, pos }
    }

    /// Cursor at the first entry of `map`.
    pub fn begin(map: R) -> Self {
        let pos = Map::first(&*map);
        Self { map, pos }
    }

    /// Past-the-end cursor of `map`.
    pub fn end(map: R) -> Self {
        Self { map, pos: None }
    }

    pub fn position(&self) -> Option<&<R::Target as Map>::Pos> {
        self.pos.as_ref()
    }

    pub fn map(&self) -> &R::Target {
        &self.map
    }
}

impl<R> Clone for MapCursor<R>
where
    R: Deref + Clone,
    R::Target: Map,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            pos: self.pos.clone(),
        }
    }
}

impl<R> PartialEq for MapCursor<R>
where
    R: Deref,
    R::Target: Map,
{
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(&*self.map, &*other.map) && self.pos == other.pos
    }
}

impl<R> Eq for MapCursor<R>
where
    R: Deref,
    R::Target: Map,
{
}

impl<R> Cursor for MapCursor<R>
where
    R: Deref + Clone,
    R::Target: Map,
{
    type Key = <R::Target as Map>::Key;
    type Value = <R::Target as Map>::Value;

    fn entry(&self) -> Option<(&Self::Key, &Self::Value)> {
        let pos = self.pos.as_ref()?;
        self.map.entry_at(pos)
    }

    fn advance(&mut self) {
        if let Some(pos) = self.pos.take() {
            self.pos = self.map.successor(&pos);
        }
    }

    fn is_end(&self) -> bool {
        self.pos.is_none()
    }
}

/// Borrowing iterator over the entries of a `Map` in native order.
pub struct Entries<'a, M: Map> {
    map: &'a M,
    pos: Option<M::Pos>,
}

impl<'a, M: Map> Entries<'a, M> {
    pub fn new(map: &'a M) -> Self {
        Self {
            map,
            pos: map.first(),
        }
    }
}

impl<'a, M: Map> Iterator for Entries<'a, M> {
    type Item = (&'a M::Key, &'a M::Value);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos.take()?;
        let map = self.map;
        let entry = map.entry_at(&pos)?;
        self.pos = map.successor(&pos);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.pos {
            Some(_) => (1, Some(self.map.len())),
            None => (0, Some(0)),
        }
    }
}
