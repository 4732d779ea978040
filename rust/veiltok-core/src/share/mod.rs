//! Additive secret sharing of embedding vectors.
//!
//! # Encoding
//! Embedding vectors are made of floats, while additive secret sharing works on the elements of a
//! finite group. A [`ShareConfig`] describes how floats are embedded into the group: values are
//! clamped to the configured [`BoundType`], shifted into the non-negative reals, scaled by
//! `10^precision` and truncated. The group order is a power of two that is large enough to hold
//! the sum of as many encoded vectors as the [`SummandType`] allows.
//!
//! # Sharing
//! A vector is split into two [`ShareVect`]s by a [`Splitter`]. The first share is a mask derived
//! from a [`ShareSeed`], the second is the encoded vector minus the mask. In the protocol the seed
//! is drawn by a crypto provider, which stores the mask on the first holder and delivers the seed,
//! sealed as an [`EncryptedShareSeed`], to the worker that owns the plaintext. That worker derives
//! the same mask and stores the complementary share on the second holder.
//!
//! ```
//! # use veiltok_core::share::{reconstruct, ShareConfig, Splitter};
//! let values = vec![0.5_f32, -0.25, 1.0];
//! let (mask, share) = Splitter::new(ShareConfig::default()).split(&values).unwrap();
//! let plain: Vec<f32> = reconstruct(&mask, &share).unwrap();
//! assert_eq!(plain, values);
//! ```
//!
//! # Addition
//! Shares held by the same party can be added locally with [`ShareVect::add()`]. Adding the
//! shares of two vectors on both holders yields shares of the sum of the vectors.
//!
//! # Handles
//! The coordinator refers to a shared vector through an [`EncryptedVector`], which only contains
//! pointers to the two shares.

pub(crate) mod config;
pub(crate) mod encrypted;
pub(crate) mod seed;
pub(crate) mod vector;

pub use self::{
    config::{BoundType, InvalidShareConfigError, ShareConfig, SummandType, MAX_PRECISION},
    encrypted::EncryptedVector,
    seed::{EncryptedShareSeed, SeedDecryptionError, ShareSeed},
    vector::{complement, encode, reconstruct, ShareError, ShareVect, Splitter},
};
