//! LazyIter: a cursor that presents each entry through a transform,
//! computed on first access and cached until the cursor moves.
//!
//! State per position is either stale or fresh:
//! - construction and every `advance` leave the iterator stale, without
//!   calling the transform;
//! - reading while stale runs the transform once and caches the result;
//! - reading while fresh returns the cache.
//!
//! The cache belongs to one iterator value. Cloning a fresh iterator copies
//! the cached result, cloning a stale one copies nothing, and advancing one
//! copy never affects another.

use crate::lazy::Memo;
use crate::map::Cursor;

/// One-way transform of a key/value entry.
///
/// Implemented for every `Fn(&K, &V) -> O`; adapters implement it for their
/// own transform types.
pub trait EntryMap<K: ?Sized, V: ?Sized> {
    type Output;

    fn map_entry(&self, key: &K, value: &V) -> Self::Output;
}

impl<K: ?Sized, V: ?Sized, O, F> EntryMap<K, V> for F
where
    F: Fn(&K, &V) -> O,
{
    type Output = O;

    #[inline]
    fn map_entry(&self, key: &K, value: &V) -> O {
        self(key, value)
    }
}

pub struct LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value>,
{
    cursor: C,
    transform: F,
    memo: Memo<F::Output>,
}

impl<C, F> LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value>,
{
    pub fn new(cursor: C, transform: F) -> Self {
        Self {
            cursor,
            transform,
            memo: Memo::Stale,
        }
    }

    /// The underlying source position.
    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn into_cursor(self) -> C {
        self.cursor
    }

    pub fn transform(&self) -> &F {
        &self.transform
    }

    /// Move to the next source entry. The cache is dropped, nothing is
    /// computed.
    pub fn advance(&mut self) {
        self.cursor.advance();
        self.memo.invalidate();
    }

    /// Advance and return the iterator as it was before, cache included.
    pub fn post_advance(&mut self) -> Self
    where
        F: Clone,
        F::Output: Clone,
    {
        let before = self.clone();
        self.advance();
        before
    }

    pub fn is_stale(&self) -> bool {
        self.memo.is_stale()
    }

    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }

    /// The transformed entry under the cursor, `None` at the end.
    ///
    /// If the transform panics the cache stays stale, so a later read
    /// retries the computation.
    pub fn current(&mut self) -> Option<&F::Output> {
        self.current_mut().map(|value| &*value)
    }

    /// Mutable access to the cached transformed entry. Changes are local to
    /// this iterator and never reach the source.
    pub fn current_mut(&mut self) -> Option<&mut F::Output> {
        let (key, value) = self.cursor.entry()?;
        let transform = &self.transform;
        Some(self.memo.get_or_insert_with(|| transform.map_entry(key, value)))
    }
}

impl<C, F, T, E> LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value, Output = Result<T, E>>,
{
    /// Read through a fallible transform. An error is handed to the caller
    /// and leaves the cache stale; only successes are cached.
    pub fn try_current<'a>(&'a mut self) -> Result<Option<&'a T>, E>
    where
        E: 'a,
    {
        let Some((key, value)) = self.cursor.entry() else {
            return Ok(None);
        };
        if !matches!(self.memo.get(), Some(Ok(_))) {
            match self.transform.map_entry(key, value) {
                Ok(computed) => {
                    self.memo.set(Ok(computed));
                }
                Err(err) => {
                    self.memo.invalidate();
                    return Err(err);
                }
            }
        }
        match self.memo.get() {
            Some(Ok(computed)) => Ok(Some(computed)),
            _ => unreachable!("successful result cached above"),
        }
    }
}

impl<C, F> Clone for LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value> + Clone,
    F::Output: Clone,
{
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            transform: self.transform.clone(),
            memo: self.memo.clone(),
        }
    }
}

/// Equality is on source position only; cache state is ignored.
impl<C, F> PartialEq for LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value>,
{
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor
    }
}

impl<C, F> Iterator for LazyIter<C, F>
where
    C: Cursor,
    F: EntryMap<C::Key, C::Value>,
{
    type Item = F::Output;

    fn next(&mut self) -> Option<F::Output> {
        let (key, value) = self.cursor.entry()?;
        let item = match self.memo.take() {
            Some(cached) => cached,
            None => self.transform.map_entry(key, value),
        };
        self.cursor.advance();
        Some(item)
    }
}
