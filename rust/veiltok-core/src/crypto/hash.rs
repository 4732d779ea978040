//! `SHA256` digests for seeding deterministic streams.
//!
//! See the [crypto module] documentation since this is a private module anyways.
//!
//! [crypto module]: crate::crypto

use sodiumoxide::crypto::hash::sha256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A digest of the `SHA256` hash function.
pub struct Sha256(sha256::Digest);

impl Sha256 {
    /// Number of bytes of a digest.
    pub const LENGTH: usize = sha256::DIGESTBYTES;

    /// Computes the digest of the message `m`.
    pub fn hash(m: &[u8]) -> Self {
        Self(sha256::hash(m))
    }

    /// Gets the digest as an array, e.g. to seed a PRNG.
    pub fn as_array(&self) -> [u8; Self::LENGTH] {
        (self.0).0
    }
}
