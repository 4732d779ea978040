//! Handles to secret-shared vectors.
//!
//! See the [share module] documentation since this is a private module anyways.
//!
//! [share module]: crate::share

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    common::WorkerId,
    pointer::{kind, Pointer},
    share::config::ShareConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An encrypted vector: a vector additively secret-shared between two holder workers.
///
/// The coordinator only holds pointers to the two shares. Neither share on its own reveals
/// anything about the vector, and the vector never materializes in plaintext at the coordinator.
pub struct EncryptedVector {
    len: usize,
    config: ShareConfig,
    summands: u64,
    crypto_provider: WorkerId,
    shares: [Pointer<kind::Share>; 2],
}

#[allow(clippy::len_without_is_empty)]
impl EncryptedVector {
    /// Creates an encrypted vector from the pointers to its two shares.
    pub fn new(
        len: usize,
        config: ShareConfig,
        summands: u64,
        crypto_provider: WorkerId,
        shares: [Pointer<kind::Share>; 2],
    ) -> Self {
        Self {
            len,
            config,
            summands,
            crypto_provider,
            shares,
        }
    }

    /// Gets the length of the shared vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Gets the sharing configuration.
    pub fn config(&self) -> ShareConfig {
        self.config
    }

    /// Gets the number of vectors summed up in this encrypted vector.
    pub fn summands(&self) -> u64 {
        self.summands
    }

    /// Gets the worker that dealt the masks of this vector.
    pub fn crypto_provider(&self) -> &WorkerId {
        &self.crypto_provider
    }

    /// Gets the pointers to the shares, in holder order.
    pub fn shares(&self) -> &[Pointer<kind::Share>; 2] {
        &self.shares
    }

    /// Gets the two holder workers, in holder order.
    pub fn holders(&self) -> (&WorkerId, &WorkerId) {
        (self.shares[0].location(), self.shares[1].location())
    }
}

impl fmt::Display for EncryptedVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "[EncryptedVector | len {} | crypto provider {}]",
            self.len, self.crypto_provider
        )?;
        write!(f, "\t-> {}\n\t-> {}", self.shares[0], self.shares[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ObjectId;

    #[test]
    fn test_display_lists_share_pointers() {
        let vector = EncryptedVector::new(
            300,
            ShareConfig::default(),
            1,
            "crypto_provider".into(),
            [
                Pointer::new("me".into(), "alice".into(), ObjectId::from(1)),
                Pointer::new("me".into(), "bob".into(), ObjectId::from(2)),
            ],
        );
        assert_eq!(
            vector.to_string(),
            "[EncryptedVector | len 300 | crypto provider crypto_provider]\n\
             \t-> [SharePointer | me -> alice:1]\n\
             \t-> [SharePointer | me -> bob:2]"
        );
        let (alice, bob) = (WorkerId::from("alice"), WorkerId::from("bob"));
        assert_eq!(vector.holders(), (&alice, &bob));
    }
}
