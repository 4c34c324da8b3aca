//! BijectiveMap: an external key/value view over a store that holds a
//! different internal representation.
//!
//! Each operation translates at the boundary. Keys and values going in pass
//! through `forward` of their bijection; entries coming out are mapped back
//! through `inverse` lazily, by a [`LazyIter`] positioned on the store. The
//! adapter owns no entries of its own: it holds a handle to the store (see
//! [`Indirect`]) and the two bijections.
//!
//! Storage semantics are the store's. Iteration follows the store's native
//! order, and a second insert under an internal key already present is a
//! silent no-op, which includes two distinct external keys whose `forward`
//! images coincide. Use [`BijectiveMap::try_insert`] to have that case
//! reported instead.
//!
//! With a shared handle (`Rc<RefCell<_>>`), adapters over the same store see
//! each other's writes at once. Cursors returned by one adapter hold a
//! `RefCell` borrow, so writing through any adapter while such a cursor is
//! alive panics.

use crate::bijection::{Bijective, Identity};
use crate::error::InsertError;
use crate::indirect::Indirect;
use crate::lazy_iter::{EntryMap, LazyIter};
use crate::map::{Map, MapCursor};

/// Maps stored entries back to their external form.
pub struct Outward<'a, KB, VB> {
    keys: &'a KB,
    values: &'a VB,
}

impl<'a, KB, VB> Clone for Outward<'a, KB, VB> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, KB, VB> Copy for Outward<'a, KB, VB> {}

impl<'a, KB, VB> EntryMap<KB::Internal, VB::Internal> for Outward<'a, KB, VB>
where
    KB: Bijective,
    VB: Bijective,
{
    type Output = (KB::External, VB::External);

    #[inline]
    fn map_entry(&self, key: &KB::Internal, value: &VB::Internal) -> Self::Output {
        (self.keys.inverse(key), self.values.inverse(value))
    }
}

/// Cursor over a `BijectiveMap`, yielding external `(key, value)` pairs.
pub type Iter<'a, H, KB, VB> = LazyIter<MapCursor<<H as Indirect>::Ref<'a>>, Outward<'a, KB, VB>>;

pub struct BijectiveMap<H, KB, VB> {
    container: H,
    keys: KB,
    values: VB,
}

type StoreKey<H> = <<H as Indirect>::Target as Map>::Key;
type StoreValue<H> = <<H as Indirect>::Target as Map>::Value;

impl<H, KB, VB> BijectiveMap<H, KB, VB>
where
    H: Indirect,
    H::Target: Map,
    KB: Bijective<Internal = StoreKey<H>>,
    VB: Bijective<Internal = StoreValue<H>>,
{
    pub fn new(container: H, keys: KB, values: VB) -> Self {
        Self {
            container,
            keys,
            values,
        }
    }

    fn outward(&self) -> Outward<'_, KB, VB> {
        Outward {
            keys: &self.keys,
            values: &self.values,
        }
    }

    fn cursor_at(&self, pos: Option<<H::Target as Map>::Pos>) -> Iter<'_, H, KB, VB> {
        LazyIter::new(MapCursor::new(self.container.get(), pos), self.outward())
    }

    /// Insert the internal image of `(key, value)`.
    ///
    /// Returns a cursor to the entry stored under the key and whether a new
    /// entry was added. If the internal key was already present the stored
    /// entry is left as it was.
    pub fn insert(
        &mut self,
        key: KB::External,
        value: VB::External,
    ) -> (Iter<'_, H, KB, VB>, bool) {
        let internal_key = self.keys.forward(&key);
        let internal_value = self.values.forward(&value);
        let (pos, inserted) =
            Map::insert(&mut *self.container.get_mut(), internal_key, internal_value);
        if !inserted {
            log::trace!("bijective insert: internal key already present, existing entry kept");
        }
        (self.cursor_at(Some(pos)), inserted)
    }

    /// Like [`insert`](Self::insert), but an occupied internal key is an
    /// error and the store is not touched.
    ///
    /// The stored entry's key is mapped back through `inverse`: if it reads
    /// back as `key` the error is `DuplicateKey`, otherwise another external
    /// key got there first and the error is `KeyCollision`.
    pub fn try_insert(
        &mut self,
        key: KB::External,
        value: VB::External,
    ) -> Result<Iter<'_, H, KB, VB>, InsertError>
    where
        KB::External: PartialEq,
    {
        let internal_key = self.keys.forward(&key);
        if let Some(err) = self.occupied_by(&internal_key, &key) {
            log::debug!("bijective try_insert rejected: {err}");
            return Err(err);
        }
        let internal_value = self.values.forward(&value);
        let (pos, _) = Map::insert(&mut *self.container.get_mut(), internal_key, internal_value);
        Ok(self.cursor_at(Some(pos)))
    }

    fn occupied_by(&self, internal_key: &StoreKey<H>, key: &KB::External) -> Option<InsertError>
    where
        KB::External: PartialEq,
    {
        let store = self.container.get();
        let pos = Map::find(&*store, internal_key)?;
        let (stored, _) = Map::entry_at(&*store, &pos)?;
        let err = if self.keys.inverse(stored) == *key {
            InsertError::DuplicateKey
        } else {
            InsertError::KeyCollision
        };
        Some(err)
    }

    /// Cursor to the entry under `key`; equal to [`end`](Self::end) when
    /// absent.
    pub fn find(&self, key: &KB::External) -> Iter<'_, H, KB, VB> {
        let store = self.container.get();
        let pos = Map::find(&*store, &self.keys.forward(key));
        LazyIter::new(MapCursor::new(store, pos), self.outward())
    }

    /// The external value under `key`.
    pub fn get(&self, key: &KB::External) -> Option<VB::External> {
        let store = self.container.get();
        let pos = Map::find(&*store, &self.keys.forward(key))?;
        let (_, stored) = Map::entry_at(&*store, &pos)?;
        let value = self.values.inverse(stored);
        Some(value)
    }

    pub fn contains_key(&self, key: &KB::External) -> bool {
        Map::find(&*self.container.get(), &self.keys.forward(key)).is_some()
    }

    /// Remove the entry under `key`. Returns the number removed (0 or 1).
    pub fn erase(&mut self, key: &KB::External) -> usize {
        let internal_key = self.keys.forward(key);
        let removed = Map::erase(&mut *self.container.get_mut(), &internal_key);
        if removed > 0 {
            log::trace!("bijective erase: removed {removed} entry");
        }
        removed
    }

    pub fn begin(&self) -> Iter<'_, H, KB, VB> {
        LazyIter::new(MapCursor::begin(self.container.get()), self.outward())
    }

    pub fn end(&self) -> Iter<'_, H, KB, VB> {
        LazyIter::new(MapCursor::end(self.container.get()), self.outward())
    }

    /// External `(key, value)` pairs in the store's native order.
    pub fn iter(&self) -> Iter<'_, H, KB, VB> {
        self.begin()
    }

    pub fn len(&self) -> usize {
        Map::len(&*self.container.get())
    }

    pub fn is_empty(&self) -> bool {
        Map::is_empty(&*self.container.get())
    }

    pub fn clear(&mut self) {
        Map::clear(&mut *self.container.get_mut());
    }

    /// The store in its internal representation. Nothing written through
    /// this is translated or checked.
    pub fn container(&self) -> H::Ref<'_> {
        self.container.get()
    }

    pub fn container_mut(&mut self) -> H::RefMut<'_> {
        self.container.get_mut()
    }

    pub fn handle(&self) -> &H {
        &self.container
    }

    pub fn into_handle(self) -> H {
        self.container
    }

    pub fn key_bijection(&self) -> &KB {
        &self.keys
    }

    pub fn value_bijection(&self) -> &VB {
        &self.values
    }
}

impl<H> BijectiveMap<H, Identity<StoreKey<H>>, Identity<StoreValue<H>>>
where
    H: Indirect,
    H::Target: Map,
    StoreKey<H>: Clone,
    StoreValue<H>: Clone,
{
    /// A view that passes keys and values through unchanged.
    pub fn identity(container: H) -> Self {
        Self::new(container, Identity::new(), Identity::new())
    }
}

impl<H, KB, VB> Extend<(KB::External, VB::External)> for BijectiveMap<H, KB, VB>
where
    H: Indirect,
    H::Target: Map,
    KB: Bijective<Internal = StoreKey<H>>,
    VB: Bijective<Internal = StoreValue<H>>,
{
    fn extend<T: IntoIterator<Item = (KB::External, VB::External)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bijection::Bijection;
    use crate::indexed_hash_map::IndexedHashMap;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn cents() -> Bijection<f64, i64, fn(&f64) -> i64, fn(&i64) -> f64> {
        Bijection::new(
            (|d: &f64| (d * 100.0).round() as i64) as fn(&f64) -> i64,
            (|c: &i64| *c as f64 / 100.0) as fn(&i64) -> f64,
        )
    }

    #[test]
    fn translates_both_directions() {
        let mut m = BijectiveMap::new(BTreeMap::new(), Identity::<String>::new(), cents());
        let (mut it, inserted) = m.insert("tea".to_string(), 2.5);
        assert!(inserted);
        assert_eq!(it.current(), Some(&("tea".to_string(), 2.5)));
        drop(it);

        assert_eq!(m.container().get("tea"), Some(&250));
        assert_eq!(m.get(&"tea".to_string()), Some(2.5));
        assert_eq!(m.get(&"milk".to_string()), None);
    }

    /// Invariant: a lookup miss is the end cursor, and erasing a missing
    /// key removes nothing.
    #[test]
    fn missing_key_is_end() {
        let mut m = BijectiveMap::identity(BTreeMap::<u8, u8>::new());
        m.insert(1, 10);
        assert!(m.find(&2) == m.end());
        assert!(m.find(&1) != m.end());
        assert_eq!(m.erase(&2), 0);
        assert_eq!(m.erase(&1), 1);
        assert!(m.is_empty());
    }

    /// Invariant: iteration order is the store's, and each entry is mapped
    /// back once per position.
    #[test]
    fn iteration_follows_store_order() {
        let calls = Cell::new(0);
        let neg = Bijection::new(
            |k: &i32| -k,
            |k: &i32| {
                calls.set(calls.get() + 1);
                -k
            },
        );
        let mut m = BijectiveMap::new(BTreeMap::new(), neg, Identity::<char>::new());
        m.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
        calls.set(0);

        let keys: Vec<i32> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![3, 2, 1]);
        assert_eq!(calls.get(), 3);
    }

    /// Invariant: colliding forward images are dropped by `insert` and
    /// reported by `try_insert`.
    #[test]
    fn key_collisions() {
        let fold = Bijection::new(|s: &String| s.to_lowercase(), |s: &String| s.clone());
        let mut m = BijectiveMap::new(BTreeMap::new(), fold, Identity::<u32>::new());

        assert!(m.insert("Key".to_string(), 1).1);
        let (mut it, inserted) = m.insert("KEY".to_string(), 2);
        assert!(!inserted);
        assert_eq!(it.current(), Some(&("key".to_string(), 1)));
        drop(it);

        assert_eq!(
            m.try_insert("kEy".to_string(), 3).err(),
            Some(InsertError::KeyCollision)
        );
        assert_eq!(
            m.try_insert("key".to_string(), 4).err(),
            Some(InsertError::DuplicateKey)
        );
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&"KEY".to_string()), Some(1));

        let ok = m.try_insert("other".to_string(), 5).map(|mut it| it.current().cloned());
        assert_eq!(ok, Ok(Some(("other".to_string(), 5))));
    }

    /// Invariant: a value transform that panics during insert leaves the
    /// store as it was.
    #[test]
    fn panicking_forward_commits_nothing() {
        let checked = Bijection::new(
            |n: &i32| u32::try_from(*n).expect("non-negative"),
            |n: &u32| *n as i32,
        );
        let mut m = BijectiveMap::new(BTreeMap::new(), Identity::<u8>::new(), checked);
        m.insert(1, 10);

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.insert(2, -1);
        }));
        assert!(res.is_err());
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = m.try_insert(3, -1);
        }));
        assert!(res.is_err());

        assert_eq!(m.len(), 1);
        let stored: Vec<(u8, u32)> = m.container().iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(stored, vec![(1, 10)]);
    }

    /// Invariant: adapters sharing a store see each other's writes, and a
    /// write while a cursor borrows the store panics.
    #[test]
    fn shared_store_is_visible_to_every_adapter() {
        let store: Rc<RefCell<BTreeMap<String, String>>> = Rc::default();
        let tagged = || {
            Bijection::new(
                |n: &i32| format!("A{n}"),
                |s: &String| s[1..].parse::<i32>().unwrap(),
            )
        };
        let mut ints = BijectiveMap::new(store.clone(), Identity::<String>::new(), tagged());
        let raw = BijectiveMap::identity(store.clone());

        ints.insert("ONE".to_string(), 1);
        assert_eq!(raw.get(&"ONE".to_string()), Some("A1".to_string()));
        assert_eq!(raw.len(), 1);

        let held = raw.begin();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ints.clear();
        }));
        assert!(res.is_err());
        drop(held);

        ints.clear();
        assert!(raw.is_empty());
    }

    #[test]
    fn unordered_store_by_exclusive_handle() {
        let mut m = BijectiveMap::new(
            Box::new(IndexedHashMap::new()),
            Identity::<u64>::new(),
            Bijection::new(|s: &&str| s.len(), |n: &usize| if *n == 3 { "abc" } else { "?" }),
        );
        m.insert(7, "abc");
        assert_eq!(m.container().get(&7), Some(&3));
        assert_eq!(m.get(&7), Some("abc"));

        let mut it = m.find(&7);
        assert!(!it.is_end());
        it.advance();
        assert!(it.is_end());
        assert!(it == m.end());
    }

    #[test]
    fn lent_store_outlives_adapter() {
        let mut store = BTreeMap::new();
        {
            let mut m = BijectiveMap::new(&mut store, Identity::<u8>::new(), cents());
            m.insert(1, 0.25);
            assert_eq!(m.key_bijection().forward(&1), 1);
            assert_eq!(m.value_bijection().forward(&0.25), 25);
            m.container_mut().insert(2, 50);
            assert_eq!(m.get(&2), Some(0.5));
        }
        assert_eq!(store.len(), 2);
    }
}
