//! Uniform access to a container however it is held.
//!
//! An adapter stores a handle `H` and reaches the container through
//! `H::get`/`H::get_mut`. The handle's storage discipline is fixed by its
//! type, so dispatch is static:
//!
//! - `Box<T>`: the adapter owns the container exclusively.
//! - `&mut T`: the container is owned elsewhere and lent to the adapter.
//! - `Rc<RefCell<T>>`: shared ownership. Every adapter over the same cell
//!   observes the others' mutations immediately. Accesses are checked by
//!   `RefCell`: mutating the store while a cursor from another adapter is
//!   alive panics at the borrow.
//! - `Inline<T>`, `BTreeMap`, `IndexedHashMap`: held by value.
//!
//! Dereferencing never inspects or changes the handle's lifetime.
//!
//! Generic code holding `h: &mut H` should call `Indirect::get(&*h)`: the
//! method form `h.get()` resolves to the `&mut T` impl and yields `&H`.

use crate::indexed_hash_map::IndexedHashMap;
use core::cell::{self, RefCell};
use core::hash::{BuildHasher, Hash};
use core::ops::{Deref, DerefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A handle through which a `Target` can be borrowed.
pub trait Indirect {
    type Target;

    /// Shared access. Cloneable so cursors holding it can be duplicated.
    type Ref<'a>: Deref<Target = Self::Target> + Clone
    where
        Self: 'a;

    type RefMut<'a>: DerefMut<Target = Self::Target>
    where
        Self: 'a;

    fn get(&self) -> Self::Ref<'_>;

    fn get_mut(&mut self) -> Self::RefMut<'_>;
}

impl<T> Indirect for Box<T> {
    type Target = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a;
    type RefMut<'a>
        = &'a mut T
    where
        Self: 'a;

    #[inline]
    fn get(&self) -> &T {
        self
    }

    #[inline]
    fn get_mut(&mut self) -> &mut T {
        self
    }
}

impl<'b, T> Indirect for &'b mut T {
    type Target = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a;
    type RefMut<'a>
        = &'a mut T
    where
        Self: 'a;

    #[inline]
    fn get(&self) -> &T {
        self
    }

    #[inline]
    fn get_mut(&mut self) -> &mut T {
        self
    }
}

/// Shared borrow of a `RefCell`-held container that cursors can clone.
pub struct Shared<'a, T>(cell::Ref<'a, T>);

impl<'a, T> Clone for Shared<'a, T> {
    fn clone(&self) -> Self {
        Shared(cell::Ref::clone(&self.0))
    }
}

impl<'a, T> Deref for Shared<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Indirect for Rc<RefCell<T>> {
    type Target = T;
    type Ref<'a>
        = Shared<'a, T>
    where
        Self: 'a;
    type RefMut<'a>
        = cell::RefMut<'a, T>
    where
        Self: 'a;

    fn get(&self) -> Shared<'_, T> {
        Shared(RefCell::borrow(self))
    }

    fn get_mut(&mut self) -> cell::RefMut<'_, T> {
        RefCell::borrow_mut(self)
    }
}

/// A container held by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inline<T>(pub T);

impl<T> Inline<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Indirect for Inline<T> {
    type Target = T;
    type Ref<'a>
        = &'a T
    where
        Self: 'a;
    type RefMut<'a>
        = &'a mut T
    where
        Self: 'a;

    #[inline]
    fn get(&self) -> &T {
        &self.0
    }

    #[inline]
    fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<K, V> Indirect for BTreeMap<K, V> {
    type Target = Self;
    type Ref<'a>
        = &'a Self
    where
        Self: 'a;
    type RefMut<'a>
        = &'a mut Self
    where
        Self: 'a;

    #[inline]
    fn get(&self) -> &Self {
        self
    }

    #[inline]
    fn get_mut(&mut self) -> &mut Self {
        self
    }
}

impl<K, V, S> Indirect for IndexedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Target = Self;
    type Ref<'a>
        = &'a Self
    where
        Self: 'a;
    type RefMut<'a>
        = &'a mut Self
    where
        Self: 'a;

    #[inline]
    fn get(&self) -> &Self {
        self
    }

    #[inline]
    fn get_mut(&mut self) -> &mut Self {
        self
    }
}
