#![cfg(test)]

// Property tests for BijectiveMap against a BTreeMap model of the external
// view.

use crate::bijection::Bijection;
use crate::bijective_map::BijectiveMap;
use crate::error::InsertError;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type PaddedKey = Bijection<u16, String, fn(&u16) -> String, fn(&String) -> u16>;
type WideValue = Bijection<i32, i64, fn(&i32) -> i64, fn(&i64) -> i32>;

// Zero padding makes the internal string order agree with the numeric
// order of external keys.
fn padded() -> PaddedKey {
    Bijection::new(
        (|k: &u16| format!("{k:05}")) as fn(&u16) -> String,
        (|s: &String| s.parse().unwrap_or(u16::MAX)) as fn(&String) -> u16,
    )
}

fn widened() -> WideValue {
    Bijection::new(
        (|v: &i32| i64::from(*v) << 8) as fn(&i32) -> i64,
        (|v: &i64| (*v >> 8) as i32) as fn(&i64) -> i32,
    )
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    TryInsert(u16, i32),
    Erase(u16),
    Find(u16),
    Iterate,
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // Small key space so inserts collide and erases hit.
    let key = 0u16..24;
    let op = prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::TryInsert(k, v)),
        3 => key.clone().prop_map(Op::Erase),
        3 => key.prop_map(Op::Find),
        1 => Just(Op::Iterate),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

type Sut = BijectiveMap<Rc<RefCell<BTreeMap<String, i64>>>, PaddedKey, WideValue>;

fn check_op(sut: &mut Sut, model: &mut BTreeMap<u16, i32>, op: Op) -> Result<(), TestCaseError> {
    match op {
        Op::Insert(k, v) => {
            let already = model.contains_key(&k);
            let (mut it, inserted) = sut.insert(k, v);
            prop_assert_eq!(inserted, !already);
            let expected = (k, *model.entry(k).or_insert(v));
            prop_assert_eq!(it.current(), Some(&expected));
        }
        Op::TryInsert(k, v) => match sut.try_insert(k, v) {
            Ok(mut it) => {
                prop_assert!(!model.contains_key(&k));
                let expected = (k, v);
                prop_assert_eq!(it.current(), Some(&expected));
                model.insert(k, v);
            }
            Err(e) => {
                prop_assert_eq!(e, InsertError::DuplicateKey);
                prop_assert!(model.contains_key(&k));
            }
        },
        Op::Erase(k) => {
            let expected = usize::from(model.remove(&k).is_some());
            prop_assert_eq!(sut.erase(&k), expected);
        }
        Op::Find(k) => {
            let mut it = sut.find(&k);
            match model.get(&k) {
                Some(&v) => {
                    let expected = (k, v);
                    prop_assert_eq!(it.current(), Some(&expected));
                }
                None => {
                    prop_assert!(it.is_end());
                    prop_assert!(it == sut.end());
                }
            }
            prop_assert_eq!(sut.get(&k), model.get(&k).copied());
        }
        Op::Iterate => {
            let seen: Vec<(u16, i32)> = sut.iter().collect();
            let expected: Vec<(u16, i32)> = model.iter().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(seen, expected);
        }
        Op::Clear => {
            sut.clear();
            model.clear();
        }
    }
    Ok(())
}

// Property: the adapter behaves like a BTreeMap of external pairs with
// insert-if-absent semantics.
// - `insert` reports `inserted` iff the key was absent; the returned cursor
//   reads back the stored pair.
// - `try_insert` never overwrites; round-tripping keys only ever report
//   `DuplicateKey`.
// - `find`/`get` agree with the model; misses are the end cursor.
// - Iteration order equals the model's key order (zero-padded keys).
// - The store holds exactly the forward images of the model's pairs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_external_model(ops in arb_ops()) {
        let store: Rc<RefCell<BTreeMap<String, i64>>> = Rc::default();
        let mut sut: Sut = BijectiveMap::new(store.clone(), padded(), widened());
        let mut model: BTreeMap<u16, i32> = BTreeMap::new();

        for op in ops {
            check_op(&mut sut, &mut model, op)?;
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        let images: BTreeMap<String, i64> = model
            .iter()
            .map(|(k, v)| (format!("{k:05}"), i64::from(*v) << 8))
            .collect();
        let stored = store.borrow().clone();
        prop_assert_eq!(stored, images);
    }
}
