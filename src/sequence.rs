//! Match a stream of adjacent pairs against a reference sequence.
//!
//! The predicate keeps two reference positions, `current` and the one after
//! it. A pair `(a, b)` matches when `a` compares equal to `current` and `b`
//! to `next`; both positions then move forward by one. A mismatch moves
//! nothing. Once `next` runs off the end of the reference sequence every
//! further call fails, and there is no reset.

use core::fmt;

pub struct SequencePredicate<I: Iterator, C> {
    rest: I,
    current: Option<I::Item>,
    next: Option<I::Item>,
    compare: C,
}

impl<I, C> SequencePredicate<I, C>
where
    I: Iterator,
{
    pub fn new<S>(sequence: S, compare: C) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        let mut rest = sequence.into_iter();
        let current = rest.next();
        let next = if current.is_some() { rest.next() } else { None };
        Self {
            rest,
            current,
            next,
            compare,
        }
    }

    /// True once no further pair can match.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// The reference pair the next call must match, if any.
    pub fn expected(&self) -> Option<(&I::Item, &I::Item)> {
        Some((self.current.as_ref()?, self.next.as_ref()?))
    }

    pub fn matches<T: ?Sized>(&mut self, a: &T, b: &T) -> bool
    where
        C: FnMut(&T, &I::Item) -> bool,
    {
        let (Some(current), Some(next)) = (&self.current, &self.next) else {
            return false;
        };
        if !((self.compare)(a, current) && (self.compare)(b, next)) {
            return false;
        }
        self.current = self.next.take();
        self.next = self.rest.next();
        true
    }

    pub fn matches_pair<T>(&mut self, (a, b): (T, T)) -> bool
    where
        C: FnMut(&T, &I::Item) -> bool,
    {
        self.matches(&a, &b)
    }
}

type Equal<T> = fn(&T, &T) -> bool;

impl<I> SequencePredicate<I, Equal<I::Item>>
where
    I: Iterator,
    I::Item: PartialEq,
{
    /// Predicate comparing with `==`.
    pub fn equal<S>(sequence: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::new(sequence, |a: &I::Item, b: &I::Item| a == b)
    }
}

impl<I, C> fmt::Debug for SequencePredicate<I, C>
where
    I: Iterator,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequencePredicate")
            .field("current", &self.current)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
