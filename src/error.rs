//! Insertion errors shared by the stores and adapters.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// An entry with the same key is already stored.
    DuplicateKey,
    /// A different external key already occupies the internal key this
    /// insertion maps to.
    KeyCollision,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present"),
            InsertError::KeyCollision => {
                f.write_str("internal key already taken by a different external key")
            }
        }
    }
}

impl std::error::Error for InsertError {}
