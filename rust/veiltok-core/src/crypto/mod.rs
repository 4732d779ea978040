//! Wrappers around some of the [sodiumoxide] crypto primitives.
//!
//! The wrappers provide methods defined on structs instead of the sodiumoxide functions. This is
//! done for the `C25519` encryption key pairs and the `SHA256` hash function. Worker key pairs are
//! used by crypto providers to seal the mask seeds they deal to the worker that owns the plaintext
//! of a shared vector.
//!
//! # Examples
//! ```
//! # use veiltok_core::crypto::EncryptKeyPair;
//! let keys = EncryptKeyPair::generate();
//! let message = b"Hello world!".to_vec();
//! let cipher = keys.public.encrypt(&message);
//! assert_eq!(message, keys.secret.decrypt(&cipher, &keys.public).unwrap());
//! ```
//!
//! [sodiumoxide]: https://docs.rs/sodiumoxide/

pub(crate) mod encrypt;
pub(crate) mod hash;
pub(crate) mod prng;

use sodiumoxide::randombytes::randombytes;

pub use self::{
    encrypt::{DecryptionError, EncryptKeyPair, PublicEncryptKey, SecretEncryptKey, SEALBYTES},
    hash::Sha256,
    prng::{generate_integer, generate_unit_float},
};

/// An interface for slicing into cryptographic byte objects.
pub trait ByteObject: Sized {
    /// Length in bytes of this object
    const LENGTH: usize;

    /// Creates a new object with all the bytes initialized to `0`.
    fn zeroed() -> Self;

    /// Gets the object byte representation.
    fn as_slice(&self) -> &[u8];

    /// Creates an object from the given buffer.
    ///
    /// # Errors
    /// Returns `None` if the length of the byte-slice isn't equal to the length of the object.
    fn from_slice(bytes: &[u8]) -> Option<Self>;

    /// Generates an object with random bytes
    fn generate() -> Self {
        let bytes = randombytes(Self::LENGTH);
        match Self::from_slice(bytes.as_slice()) {
            Some(object) => object,
            // the length of the random bytes is guaranteed by the constant
            None => unreachable!("random bytes have the length of the byte object"),
        }
    }
}
