//! Sealed boxes for delivering share seeds.
//!
//! See the [crypto module] documentation since this is a private module anyways.
//!
//! [crypto module]: crate::crypto

use serde::{Deserialize, Serialize};
use sodiumoxide::crypto::{box_, sealedbox};
use thiserror::Error;

/// Number of additional bytes in a sealed message compared to the plaintext.
pub const SEALBYTES: usize = sealedbox::SEALBYTES;

#[derive(Debug, Clone)]
/// The `C25519` key pair of a worker.
///
/// Crypto providers seal the share seeds they deal to the public key of the requesting worker,
/// which is the only party able to open them.
pub struct EncryptKeyPair {
    pub public: PublicEncryptKey,
    pub secret: SecretEncryptKey,
}

impl EncryptKeyPair {
    /// Generates a fresh key pair.
    pub fn generate() -> Self {
        let (pk, sk) = box_::gen_keypair();
        Self {
            public: PublicEncryptKey(pk),
            secret: SecretEncryptKey(sk),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A `C25519` public key, registered in the network next to the worker's request channel.
pub struct PublicEncryptKey(box_::PublicKey);

impl PublicEncryptKey {
    /// Seals the message `m` to this key.
    ///
    /// The sealed message is [`SEALBYTES`] longer than `m`. The sender stays anonymous: an
    /// ephemeral key pair is generated per message and its secret half is dropped immediately.
    pub fn encrypt(&self, m: &[u8]) -> Vec<u8> {
        sealedbox::seal(m, &self.0)
    }
}

#[derive(Error, Debug)]
#[error("a sealed message could not be opened")]
/// An error related to opening a sealed message.
pub struct DecryptionError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A `C25519` secret key. It never leaves its worker.
///
/// When this goes out of scope, its contents will be zeroed out.
pub struct SecretEncryptKey(box_::SecretKey);

impl SecretEncryptKey {
    /// Opens the sealed message `c` with this key and the matching public key `pk`.
    ///
    /// # Errors
    /// Fails if `c` wasn't sealed to `pk` or has been tampered with.
    pub fn decrypt(&self, c: &[u8], pk: &PublicEncryptKey) -> Result<Vec<u8>, DecryptionError> {
        sealedbox::open(c, &pk.0, &self.0).map_err(|_| DecryptionError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealed_roundtrip() {
        let EncryptKeyPair { public, secret } = EncryptKeyPair::generate();
        let cipher = public.encrypt(b"seed material");
        assert_eq!(cipher.len(), SEALBYTES + 13);
        assert_eq!(secret.decrypt(&cipher, &public).unwrap(), b"seed material");
    }

    #[test]
    fn test_open_with_foreign_key() {
        let owner = EncryptKeyPair::generate();
        let other = EncryptKeyPair::generate();
        let cipher = owner.public.encrypt(b"seed material");
        assert!(other.secret.decrypt(&cipher, &other.public).is_err());
        // a key pair only opens with its own public half
        assert!(owner.secret.decrypt(&cipher, &other.public).is_err());
    }
}
