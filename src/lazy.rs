//! Lazily computed values with an explicit staleness state.

/// A cached result that is either stale (must be recomputed before use) or
/// fresh.
///
/// Filling the memo is all-or-nothing: if the computation panics or
/// returns an error, the memo stays stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Memo<T> {
    Stale,
    Fresh(T),
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Memo::Stale
    }
}

impl<T> Memo<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Memo::Stale)
    }

    /// Drop the cached value.
    pub fn invalidate(&mut self) {
        *self = Memo::Stale;
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Memo::Fresh(value) => Some(value),
            Memo::Stale => None,
        }
    }

    /// Move the cached value out, leaving the memo stale.
    pub fn take(&mut self) -> Option<T> {
        match core::mem::take(self) {
            Memo::Fresh(value) => Some(value),
            Memo::Stale => None,
        }
    }

    pub fn set(&mut self, value: T) -> &mut T {
        *self = Memo::Fresh(value);
        match self {
            Memo::Fresh(value) => value,
            Memo::Stale => unreachable!("memo was just filled"),
        }
    }

    /// Return the cached value, computing it with `f` first if stale.
    pub fn get_or_insert_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if self.is_stale() {
            let value = f();
            return self.set(value);
        }
        match self {
            Memo::Fresh(value) => value,
            Memo::Stale => unreachable!("stale memo handled above"),
        }
    }

    /// Like `get_or_insert_with` for fallible computations. An error is
    /// returned as-is and nothing is cached.
    pub fn try_get_or_insert_with<F, E>(&mut self, f: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.is_stale() {
            let value = f()?;
            return Ok(self.set(value));
        }
        match self {
            Memo::Fresh(value) => Ok(value),
            Memo::Stale => unreachable!("stale memo handled above"),
        }
    }
}

/// Holds an argument and a function, and the result of applying one to the
/// other once it has been asked for.
///
/// Changing the argument marks the result stale; reading it recomputes at
/// most once per change.
pub struct Lazy<A, F, R> {
    argument: A,
    f: F,
    memo: Memo<R>,
}

impl<A, F, R> Lazy<A, F, R>
where
    F: Fn(&A) -> R,
{
    pub fn new(argument: A, f: F) -> Self {
        Self {
            argument,
            f,
            memo: Memo::Stale,
        }
    }

    /// Build with a result already known for `argument`.
    pub fn with_result(argument: A, f: F, result: R) -> Self {
        Self {
            argument,
            f,
            memo: Memo::Fresh(result),
        }
    }

    pub fn argument(&self) -> &A {
        &self.argument
    }

    /// Replace the argument. The cached result becomes stale.
    pub fn set_argument(&mut self, argument: A) {
        self.argument = argument;
        self.memo.invalidate();
    }

    pub fn is_stale(&self) -> bool {
        self.memo.is_stale()
    }

    pub fn invalidate(&mut self) {
        self.memo.invalidate();
    }

    /// Evaluate the function on the current argument without touching the
    /// cache.
    pub fn compute(&self) -> R {
        (self.f)(&self.argument)
    }

    /// The cached result, if fresh.
    pub fn cached(&self) -> Option<&R> {
        self.memo.get()
    }

    /// The result for the current argument, computed at most once.
    pub fn get(&mut self) -> &R {
        let Self { argument, f, memo } = self;
        memo.get_or_insert_with(|| f(&*argument))
    }

    /// Whether the cached result matches a fresh computation. A stale cache
    /// holds nothing that could disagree.
    pub fn validate(&self) -> bool
    where
        R: PartialEq,
    {
        match self.memo.get() {
            Some(result) => self.compute() == *result,
            None => true,
        }
    }

    pub fn into_argument(self) -> A {
        self.argument
    }
}
