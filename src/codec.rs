//! Codec: an encoder and a decoder kept together under one name.
//!
//! Nothing ties the two directions to each other; see
//! [`Bijection`](crate::bijection::Bijection) for a pair with a round-trip
//! law.

#[derive(Clone, Copy, Debug, Default)]
pub struct Codec<E, D> {
    encoder: E,
    decoder: D,
}

impl<E, D> Codec<E, D> {
    pub const fn new(encoder: E, decoder: D) -> Self {
        Self { encoder, decoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn into_parts(self) -> (E, D) {
        (self.encoder, self.decoder)
    }

    #[inline]
    pub fn encode<T: ?Sized, U>(&self, value: &T) -> U
    where
        E: Fn(&T) -> U,
    {
        (self.encoder)(value)
    }

    #[inline]
    pub fn decode<T: ?Sized, U>(&self, value: &T) -> U
    where
        D: Fn(&T) -> U,
    {
        (self.decoder)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_decode_apply_their_function() {
        let hex = Codec::new(
            |n: &u32| format!("{n:x}"),
            |s: &str| u32::from_str_radix(s, 16),
        );
        let s: String = hex.encode(&255);
        assert_eq!(s, "ff");
        assert_eq!(hex.decode(s.as_str()), Ok(255));
        assert!(hex.decode("zz").is_err());
    }

    /// Invariant: the two directions are independent; a lossy pair is
    /// still a valid codec.
    #[test]
    fn directions_need_not_invert() {
        let lossy = Codec::new(|x: &f64| x.round() as i64, |n: &i64| *n as f64);
        let n: i64 = lossy.encode(&2.6);
        assert_eq!(n, 3);
        let back: f64 = lossy.decode(&n);
        assert_eq!(back, 3.0);
    }

    #[test]
    fn parts_are_accessible() {
        let c = Codec::new(|x: &i32| x + 1, |x: &i32| x - 1);
        assert_eq!((c.encoder())(&1), 2);
        assert_eq!((c.decoder())(&1), 0);
        let (enc, dec) = c.into_parts();
        assert_eq!(dec(&enc(&10)), 10);
    }
}
