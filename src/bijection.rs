//! Bijections: a forward function and its declared inverse, carried as one
//! value.
//!
//! The law `inverse(forward(x)) == x` is documented, not enforced. Breaking
//! it does not cause memory unsafety, but adapters built on a bijection
//! then return something other than what was inserted.

use crate::codec::Codec;
use core::fmt;
use core::marker::PhantomData;

/// Maps an external representation to an internal one and back.
pub trait Bijective {
    type External;
    type Internal;

    fn forward(&self, external: &Self::External) -> Self::Internal;

    fn inverse(&self, internal: &Self::Internal) -> Self::External;

    /// Check the round-trip law for one value.
    fn round_trips(&self, external: &Self::External) -> bool
    where
        Self::External: PartialEq,
    {
        self.inverse(&self.forward(external)) == *external
    }
}

/// A bijection built from two closures.
pub struct Bijection<E, I, F, G> {
    forward: F,
    inverse: G,
    _pd: PhantomData<fn(&E, &I)>,
}

impl<E, I, F, G> Bijection<E, I, F, G>
where
    F: Fn(&E) -> I,
    G: Fn(&I) -> E,
{
    pub fn new(forward: F, inverse: G) -> Self {
        Self {
            forward,
            inverse,
            _pd: PhantomData,
        }
    }

    /// The same pair seen from the other side.
    pub fn reversed(self) -> Bijection<I, E, G, F> {
        Bijection::new(self.inverse, self.forward)
    }

    /// Reuse the pair as an encoder/decoder.
    pub fn into_codec(self) -> Codec<F, G> {
        Codec::new(self.forward, self.inverse)
    }
}

impl<E, I, F, G> Bijective for Bijection<E, I, F, G>
where
    F: Fn(&E) -> I,
    G: Fn(&I) -> E,
{
    type External = E;
    type Internal = I;

    #[inline]
    fn forward(&self, external: &E) -> I {
        (self.forward)(external)
    }

    #[inline]
    fn inverse(&self, internal: &I) -> E {
        (self.inverse)(internal)
    }
}

impl<E, I, F: Clone, G: Clone> Clone for Bijection<E, I, F, G> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            inverse: self.inverse.clone(),
            _pd: PhantomData,
        }
    }
}

impl<E, I, F, G> fmt::Debug for Bijection<E, I, F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bijection")
            .field("external", &core::any::type_name::<E>())
            .field("internal", &core::any::type_name::<I>())
            .finish()
    }
}

/// The identity bijection; the default for adapters that only reshape one
/// side.
pub struct Identity<T>(PhantomData<fn(&T) -> T>);

impl<T> Identity<T> {
    pub const fn new() -> Self {
        Identity(PhantomData)
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Identity<T> {}

impl<T> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity<{}>", core::any::type_name::<T>())
    }
}

impl<T: Clone> Bijective for Identity<T> {
    type External = T;
    type Internal = T;

    #[inline]
    fn forward(&self, external: &T) -> T {
        external.clone()
    }

    #[inline]
    fn inverse(&self, internal: &T) -> T {
        internal.clone()
    }
}
