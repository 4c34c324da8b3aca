#![cfg(test)]

// IndexedHashMap against a std HashMap model, driven through both its own
// API and the `Map` contract the adapters use. Runs once with the default
// hasher and once with every key in a single bucket.

use crate::error::InsertError;
use crate::indexed_hash_map::IndexedHashMap;
use crate::map::{Entries, Map};
use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::TestCaseError;
use std::borrow::Borrow;
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};

// Owned key that can be looked up as `str`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Name(String);

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Names are drawn from a small per-case pool so steps revisit keys.
#[derive(Clone, Debug)]
enum Step {
    Insert(Index, i32),
    InsertLazily(Index, i32),
    Place(Index, i32),
    SwapRemove(Index),
    Erase(Index),
    Lookup(Index),
    Borrowed(String),
    Bump(Index, i32),
    Walk,
}

fn scenario() -> impl Strategy<Value = (Vec<String>, Vec<Step>)> {
    let names = proptest::collection::vec("[a-z]{0,4}", 1..=8);
    let step = prop_oneof![
        (any::<Index>(), any::<i32>()).prop_map(|(i, v)| Step::Insert(i, v)),
        (any::<Index>(), any::<i32>()).prop_map(|(i, v)| Step::InsertLazily(i, v)),
        (any::<Index>(), any::<i32>()).prop_map(|(i, v)| Step::Place(i, v)),
        any::<Index>().prop_map(Step::SwapRemove),
        any::<Index>().prop_map(Step::Erase),
        any::<Index>().prop_map(Step::Lookup),
        "[a-z]{0,4}".prop_map(Step::Borrowed),
        (any::<Index>(), any::<i32>()).prop_map(|(i, d)| Step::Bump(i, d)),
        Just(Step::Walk),
    ];
    (names, proptest::collection::vec(step, 1..60))
}

// Invariants checked after every step:
// - duplicates are refused by `insert`/`insert_with` and kept by
//   `Map::insert`; the lazy constructor runs only for new keys;
// - an index returned by `get_index_of` or `Map::find` holds that key, also
//   after swap-removals moved other entries;
// - dense iteration and `Map` cursor walks both see the model's entries;
// - `len` and `Map::first` agree with the model.
fn drive<S: BuildHasher>(
    mut store: IndexedHashMap<Name, i32, S>,
    names: &[String],
    steps: Vec<Step>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Name, i32> = HashMap::new();
    let built = Cell::new(0u32);
    let pick = |i: &Index| Name(i.get(names).clone());

    for step in steps {
        match step {
            Step::Insert(i, v) => {
                let name = pick(&i);
                let fresh = !model.contains_key(&name);
                match store.insert(name.clone(), v) {
                    Ok(at) => {
                        prop_assert!(fresh);
                        prop_assert_eq!(store.get_index(at), Some((&name, &v)));
                        model.insert(name, v);
                    }
                    Err(e) => {
                        prop_assert!(!fresh);
                        prop_assert_eq!(e, InsertError::DuplicateKey);
                    }
                }
            }
            Step::InsertLazily(i, v) => {
                let name = pick(&i);
                let fresh = !model.contains_key(&name);
                let before = built.get();
                let res = store.insert_with(name.clone(), || {
                    built.set(built.get() + 1);
                    v
                });
                prop_assert_eq!(res.is_ok(), fresh);
                prop_assert_eq!(built.get() - before, u32::from(fresh));
                if fresh {
                    model.insert(name, v);
                }
            }
            Step::Place(i, v) => {
                let name = pick(&i);
                let (pos, inserted) = Map::insert(&mut store, name.clone(), v);
                prop_assert_eq!(inserted, !model.contains_key(&name));
                let kept = *model.entry(name.clone()).or_insert(v);
                prop_assert_eq!(Map::entry_at(&store, &pos), Some((&name, &kept)));
            }
            Step::SwapRemove(i) => {
                let name = pick(&i);
                let removed = store.swap_remove(name.0.as_str());
                prop_assert_eq!(removed, model.remove_entry(&name));
            }
            Step::Erase(i) => {
                let name = pick(&i);
                let expected = usize::from(model.remove(&name).is_some());
                prop_assert_eq!(Map::erase(&mut store, &name), expected);
            }
            Step::Lookup(i) => {
                let name = pick(&i);
                let at = store.get_index_of(&name);
                prop_assert_eq!(at, Map::find(&store, &name));
                prop_assert_eq!(at.is_some(), model.contains_key(&name));
                if let Some(at) = at {
                    prop_assert_eq!(store.get_index(at), Some((&name, &model[&name])));
                }
            }
            Step::Borrowed(text) => {
                let expected = model.keys().any(|n| n.0 == text);
                prop_assert_eq!(store.contains_key(text.as_str()), expected);
            }
            Step::Bump(i, d) => {
                let name = pick(&i);
                match (store.get_mut(&name), model.get_mut(&name)) {
                    (Some(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence differs: {:?} vs {:?}", s, m),
                }
            }
            Step::Walk => {
                let expected: BTreeMap<Name, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let dense: BTreeMap<Name, i32> =
                    store.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let walked: BTreeMap<Name, i32> =
                    Entries::new(&store).map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&dense, &expected);
                prop_assert_eq!(walked, expected);
            }
        }

        prop_assert_eq!(store.len(), model.len());
        prop_assert_eq!(Map::first(&store).is_none(), model.is_empty());
    }
    Ok(())
}

// Every key hashes alike, so lookups resolve on `Eq` alone and swap-removal
// repoints slots inside one collision chain.
#[derive(Default)]
struct OneBucket;

impl Hasher for OneBucket {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        7
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_store_matches_model((names, steps) in scenario()) {
        drive(IndexedHashMap::new(), &names, steps)?;
    }

    #[test]
    fn prop_store_matches_model_in_one_bucket((names, steps) in scenario()) {
        let hasher = BuildHasherDefault::<OneBucket>::default();
        drive(IndexedHashMap::with_hasher(hasher), &names, steps)?;
    }
}
