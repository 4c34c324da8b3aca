//! keyview: associative-container adapters that derive keys from values or
//! present a store through a pair of inverse transforms.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: typed views over key/value storage without duplicating data. The
//!   adapters never reimplement storage; they drive a store through the
//!   `Map` contract and translate at the boundary.
//! - Layers:
//!   - Indirect: uniform access to a store held by `Box`, `&mut`,
//!     `Rc<RefCell<_>>` or by value, chosen statically by the handle type.
//!   - Map / Cursor: the store contract (insert, find, erase, ordered
//!     positions) with impls for `BTreeMap` and `IndexedHashMap`.
//!   - LazyIter: a cursor plus a one-way entry transform whose result is
//!     computed on first read and cached until the cursor moves.
//!   - HashKeyedMap: values stored under `projection(value)`.
//!   - BijectiveMap: external keys and values over an internal store, built
//!     from two bijections and `LazyIter`.
//! - Standalone: `SequencePredicate` (adjacent-pair matching against a
//!   reference sequence) and `Codec` (an encoder/decoder pair).
//!
//! Constraints
//! - Single-threaded; nothing here synchronizes. A store shared through
//!   `Rc<RefCell<_>>` is checked by `RefCell` only.
//! - Iteration order is the store's native order; adapters never re-sort.
//! - Unique keys: a second insert under a present key leaves the stored
//!   entry unchanged and reports `inserted = false`.
//! - Transforms and projections are trusted to be pure. Neither the
//!   projection invariant nor the bijection round-trip law is checked on
//!   the hot path; `HashKeyedMap::validate` and `Bijective::round_trips`
//!   check them on request.
//!
//! Lazy cache state
//! - Each `LazyIter` owns its cache. Advancing drops it without computing;
//!   reading computes at most once per position. A transform that panics or
//!   returns `Err` (through `try_current`) leaves the cache stale.
//! - Clones copy the cache as it is; equality ignores it.
//!
//! Key collisions
//! - Two external keys whose `forward` images coincide share one internal
//!   entry. `BijectiveMap::insert` keeps the first silently;
//!   `BijectiveMap::try_insert` reports `InsertError::KeyCollision` (or
//!   `DuplicateKey` for the same key) and does not touch the store.
//!
//! Reentrancy
//! - `IndexedHashMap` keeps the debug-only guard around its probing
//!   sections, where only `K: Eq/Hash` run. Adapters call user transforms
//!   outside any store borrow except the `RefCell` guard of a shared
//!   handle.
//!
//! Logging
//! - Uses the `log` facade: `trace` for suppressed duplicates and
//!   removals, `debug` for rejected inserts, `warn` for inconsistent
//!   entries found by `validate`. No logger is installed here.

pub mod bijection;
pub mod bijective_map;
mod bijective_map_proptest;
pub mod codec;
mod error;
pub mod hash_keyed;
pub mod indexed_hash_map;
mod indexed_hash_map_proptest;
pub mod indirect;
pub mod lazy;
pub mod lazy_iter;
pub mod map;
pub mod recorder;
mod reentrancy;
pub mod sequence;

// Public surface
pub use bijection::{Bijection, Bijective, Identity};
pub use bijective_map::BijectiveMap;
pub use codec::Codec;
pub use error::InsertError;
pub use hash_keyed::{HashKeyedMap, Projection, StdHash};
pub use indexed_hash_map::IndexedHashMap;
pub use indirect::{Indirect, Inline};
pub use lazy::{Lazy, Memo};
pub use lazy_iter::{EntryMap, LazyIter};
pub use map::{Cursor, Entries, Map, MapCursor};
pub use recorder::Recorder;
pub use sequence::SequencePredicate;
