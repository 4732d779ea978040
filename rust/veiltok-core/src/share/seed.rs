//! Share seeds and mask generation.
//!
//! See the [share module] documentation since this is a private module anyways.
//!
//! [share module]: crate::share

use std::iter;

use derive_more::{AsMut, AsRef};
use num::bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sodiumoxide::crypto::box_;
use thiserror::Error;

use crate::{
    crypto::{generate_integer, ByteObject, PublicEncryptKey, SecretEncryptKey, SEALBYTES},
    share::{config::ShareConfig, vector::ShareVect},
};

#[derive(Error, Debug)]
#[error("the share seed could not be decrypted")]
/// An error related to the decryption of an encrypted share seed.
pub struct SeedDecryptionError;

#[derive(AsRef, AsMut, Clone, Debug, PartialEq, Eq)]
/// A seed to generate a mask.
///
/// When this goes out of scope, its contents will be zeroed out.
pub struct ShareSeed(box_::Seed);

impl ByteObject for ShareSeed {
    const LENGTH: usize = box_::SEEDBYTES;

    fn from_slice(bytes: &[u8]) -> Option<Self> {
        box_::Seed::from_slice(bytes).map(Self)
    }

    fn zeroed() -> Self {
        Self(box_::Seed([0_u8; Self::LENGTH]))
    }

    fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl ShareSeed {
    /// Gets this seed as an array.
    pub fn as_array(&self) -> [u8; Self::LENGTH] {
        (self.0).0
    }

    /// Encrypts this seed with the given public key as an [`EncryptedShareSeed`].
    pub fn encrypt(&self, pk: &PublicEncryptKey) -> EncryptedShareSeed {
        EncryptedShareSeed(pk.encrypt(self.as_slice()))
    }

    /// Derives a mask of the given length from this seed wrt the sharing configuration.
    ///
    /// The mask elements are drawn uniformly from the finite group, so the mask represents a
    /// single summand.
    pub fn derive_mask(&self, len: usize, config: ShareConfig) -> ShareVect {
        let order = config.order();
        let mut prng = ChaCha20Rng::from_seed(self.as_array());
        let data: Vec<BigUint> = iter::repeat_with(|| generate_integer(&mut prng, &order))
            .take(len)
            .collect();
        ShareVect::new_unchecked(config, data, 1)
    }
}

#[derive(AsRef, AsMut, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A share seed sealed to the public key of the worker that owns the plaintext.
pub struct EncryptedShareSeed(Vec<u8>);

impl ByteObject for EncryptedShareSeed {
    const LENGTH: usize = SEALBYTES + ShareSeed::LENGTH;

    fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() == Self::LENGTH {
            Some(Self(bytes.to_vec()))
        } else {
            None
        }
    }

    fn zeroed() -> Self {
        Self(vec![0_u8; Self::LENGTH])
    }

    fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl EncryptedShareSeed {
    /// Decrypts this seed as a [`ShareSeed`].
    ///
    /// # Errors
    /// Fails if the decryption fails.
    pub fn decrypt(
        &self,
        pk: &PublicEncryptKey,
        sk: &SecretEncryptKey,
    ) -> Result<ShareSeed, SeedDecryptionError> {
        let bytes = sk
            .decrypt(self.as_slice(), pk)
            .map_err(|_| SeedDecryptionError)?;
        ShareSeed::from_slice(bytes.as_slice()).ok_or(SeedDecryptionError)
    }
}
