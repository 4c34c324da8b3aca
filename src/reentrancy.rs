//! Debug-only reentrancy guard.
//!
//! `IndexedHashMap` runs user `K: Hash` and `K: Eq` while it probes its index
//! table. If that code reaches back into the same map, the nested call lands
//! in the middle of a lookup or insert. Debug builds turn this into a panic;
//! release builds skip the check.

use core::cell::Cell;
use core::marker::PhantomData;

/// Open/closed flag for one map. Public entry points start with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug, Default)]
pub struct DebugReentrancy {
    open: Cell<bool>,
    // Stores are single-threaded; the guard is !Send + !Sync too.
    _local: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            open: Cell::new(false),
            _local: PhantomData,
        }
    }

    /// Open a section that may call user code. Panics in debug builds if
    /// one is already open on this map.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        if cfg!(debug_assertions) {
            let nested = self.open.replace(true);
            assert!(!nested, "IndexedHashMap re-entered from K: Hash/Eq");
        }
        ReentrancyGuard { owner: self }
    }

    /// Whether a section is open. Always `false` in release builds.
    #[inline]
    pub fn is_entered(&self) -> bool {
        self.open.get()
    }
}

/// Closes the section opened by [`DebugReentrancy::enter`] on drop.
pub struct ReentrancyGuard<'a> {
    owner: &'a DebugReentrancy,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        if cfg!(debug_assertions) {
            self.owner.open.set(false);
        }
    }
}
