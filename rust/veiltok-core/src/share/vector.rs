//! Encoding, sharing, addition and reconstruction of vectors.
//!
//! See the [share module] documentation since this is a private module anyways.
//!
//! [share module]: crate::share

use num::{
    bigint::{BigInt, BigUint, ToBigInt},
    clamp,
    rational::Ratio,
    traits::{float::FloatCore, identities::Zero},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    crypto::ByteObject,
    share::{config::ShareConfig, seed::ShareSeed},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors related to the sharing, addition and reconstruction of vectors.
pub enum ShareError {
    #[error("the value at position {0} is not finite")]
    NonFiniteValue(usize),

    #[error("the shares have incompatible sharing configurations")]
    ConfigMismatch,

    #[error("the shares have incompatible lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("the shares represent a different number of summands: {0} vs {1}")]
    SummandMismatch(u64, u64),

    #[error("too many summands for the sharing configuration: {0} > {1}")]
    TooManySummands(u64, u64),

    #[error("the share contains elements outside of the finite group")]
    InvalidShare,

    #[error("the reconstructed value at position {0} is not representable as a float")]
    NotRepresentable(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// One party's additive share of a vector.
///
/// The sum of both parties' shares modulo the group order is the fixed-point encoding of the
/// shared vector, or of the sum of `summands` shared vectors.
pub struct ShareVect {
    config: ShareConfig,
    data: Vec<BigUint>,
    summands: u64,
}

#[allow(clippy::len_without_is_empty)]
impl ShareVect {
    /// Creates a share from the given group elements.
    ///
    /// # Errors
    /// Fails if an element does not belong to the finite group or the number of summands exceeds
    /// the configured maximum.
    pub fn new(config: ShareConfig, data: Vec<BigUint>, summands: u64) -> Result<Self, ShareError> {
        if summands > config.max_summands() {
            return Err(ShareError::TooManySummands(summands, config.max_summands()));
        }
        let share = Self::new_unchecked(config, data, summands);
        if share.is_valid() {
            Ok(share)
        } else {
            Err(ShareError::InvalidShare)
        }
    }

    /// Creates a share without checking the elements against the finite group.
    pub(crate) fn new_unchecked(config: ShareConfig, data: Vec<BigUint>, summands: u64) -> Self {
        Self {
            config,
            data,
            summands,
        }
    }

    /// Gets the sharing configuration.
    pub fn config(&self) -> ShareConfig {
        self.config
    }

    /// Gets the group elements.
    pub fn data(&self) -> &[BigUint] {
        &self.data
    }

    /// Gets the length of the shared vector.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Gets the number of shared vectors summed up in this share.
    pub fn summands(&self) -> u64 {
        self.summands
    }

    /// Checks if all elements belong to the finite group.
    pub fn is_valid(&self) -> bool {
        let order = self.config.order();
        self.data.iter().all(|i| i < &order)
    }

    /// Validates if `other` may be added to this share.
    ///
    /// # Errors
    /// Fails if the configurations or lengths differ, if the shares represent a different number of
    /// summands than their counterparts would, or if the sum exceeds the configured maximum of
    /// summands.
    pub fn validate_addition(&self, other: &ShareVect) -> Result<(), ShareError> {
        if self.config != other.config {
            return Err(ShareError::ConfigMismatch);
        }
        if self.len() != other.len() {
            return Err(ShareError::LengthMismatch(self.len(), other.len()));
        }
        let summands = self.summands + other.summands;
        if summands > self.config.max_summands() {
            return Err(ShareError::TooManySummands(
                summands,
                self.config.max_summands(),
            ));
        }
        if !other.is_valid() {
            return Err(ShareError::InvalidShare);
        }
        Ok(())
    }

    /// Adds `other` to this share element-wise in the finite group.
    ///
    /// # Errors
    /// Fails if [`validate_addition()`] fails.
    ///
    /// [`validate_addition()`]: ShareVect::validate_addition
    pub fn add(&mut self, other: ShareVect) -> Result<(), ShareError> {
        self.validate_addition(&other)?;
        let order = self.config.order();
        for (i, j) in self.data.iter_mut().zip(other.data.into_iter()) {
            *i = (&*i + j) % &order;
        }
        self.summands += other.summands;
        Ok(())
    }
}

/// Encodes the given values as elements of the finite group wrt the sharing configuration.
///
/// The encoding proceeds in the following steps:
/// - Clamp the values to the configured bound.
/// - Shift the values into the non-negative reals.
/// - Scale the values by the fixed-point factor and truncate them to integers.
///
/// # Errors
/// Fails if a value is not finite.
pub fn encode<F: FloatCore>(config: &ShareConfig, values: &[F]) -> Result<Vec<BigUint>, ShareError> {
    let add_shift = config.add_shift();
    let exp_shift = config.exp_shift();
    let higher_bound = &add_shift;
    let lower_bound = -&add_shift;
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let ratio = Ratio::<BigInt>::from_float(*value).ok_or(ShareError::NonFiniteValue(i))?;
            let clamped = clamp(ratio, lower_bound.clone(), higher_bound.clone());
            // the shifted value is guaranteed to be non-negative
            ((clamped + &add_shift) * &exp_shift)
                .to_integer()
                .to_biguint()
                .ok_or(ShareError::NonFiniteValue(i))
        })
        .collect()
}

/// A splitter of vectors into two additive shares.
///
/// The first share is the mask derived from the seed, which is dealt by a crypto provider. The
/// second share is the encoded vector minus the mask. Each share on its own is uniformly
/// distributed over the finite group and reveals nothing about the vector.
pub struct Splitter {
    config: ShareConfig,
    seed: ShareSeed,
}

impl Splitter {
    /// Creates a new splitter with the given sharing `config`uration and a randomly generated seed.
    pub fn new(config: ShareConfig) -> Self {
        Self::with_seed(config, ShareSeed::generate())
    }

    /// Creates a new splitter with the given sharing `config`uration and `seed`.
    pub fn with_seed(config: ShareConfig, seed: ShareSeed) -> Self {
        Self { config, seed }
    }

    /// Splits the values into the mask share and the complementary share.
    ///
    /// # Errors
    /// Fails if a value is not finite.
    pub fn split<F: FloatCore>(self, values: &[F]) -> Result<(ShareVect, ShareVect), ShareError> {
        let encoded = encode(&self.config, values)?;
        let mask = self.seed.derive_mask(encoded.len(), self.config);
        let remainder = complement(&mask, encoded);
        Ok((mask, remainder))
    }
}

/// Computes the share which, added to `mask`, yields the `encoded` vector.
pub fn complement(mask: &ShareVect, encoded: Vec<BigUint>) -> ShareVect {
    let order = mask.config.order();
    let data = encoded
        .into_iter()
        .zip(mask.data.iter())
        // the mask element is smaller than the order, so the subtraction cannot underflow
        .map(|(value, mask)| (value % &order + &order - mask) % &order)
        .collect();
    ShareVect::new_unchecked(mask.config, data, mask.summands)
}

/// Reconstructs the shared vector from both shares.
///
/// The reconstruction reverses the encoding: the shares are added in the finite group, scaled back
/// by the fixed-point factor and shifted back by the bound once per summand.
///
/// # Errors
/// Fails if the shares are incompatible or a reconstructed value can't be represented as a float.
pub fn reconstruct<F: FloatCore>(first: &ShareVect, second: &ShareVect) -> Result<Vec<F>, ShareError> {
    if first.config != second.config {
        return Err(ShareError::ConfigMismatch);
    }
    if first.len() != second.len() {
        return Err(ShareError::LengthMismatch(first.len(), second.len()));
    }
    if first.summands != second.summands {
        return Err(ShareError::SummandMismatch(first.summands, second.summands));
    }
    if !first.is_valid() || !second.is_valid() {
        return Err(ShareError::InvalidShare);
    }

    let config = first.config;
    let order = config.order();
    let exp_shift = config.exp_shift();
    let scaled_add_shift = config.add_shift() * BigInt::from(first.summands);
    first
        .data
        .iter()
        .zip(second.data.iter())
        .enumerate()
        .map(|(i, (a, b))| {
            let n = (a + b) % &order;
            // to_bigint never fails for BigUint
            let ratio = Ratio::<BigInt>::from(n.to_bigint().unwrap_or_else(BigInt::zero));
            let value = ratio / &exp_shift - &scaled_add_shift;
            ratio_to_float(&value).ok_or(ShareError::NotRepresentable(i))
        })
        .collect()
}

/// Converts the numerical value into a primitive floating point value.
///
/// Returns `None` if the value is out of range of the primitive data type.
pub(crate) fn ratio_to_float<F: FloatCore>(ratio: &Ratio<BigInt>) -> Option<F> {
    let min_value = Ratio::from_float(F::min_value())?;
    let max_value = Ratio::from_float(F::max_value())?;
    if ratio < &min_value || ratio > &max_value {
        return None;
    }

    let mut numer = ratio.numer().clone();
    let mut denom = ratio.denom().clone();
    // terminates after at most bit-length of ratio iterations
    loop {
        if let (Some(n), Some(d)) = (F::from(numer.clone()), F::from(denom.clone())) {
            if n == F::zero() || d == F::zero() {
                break Some(F::zero());
            } else {
                let float = n / d;
                if float.is_finite() {
                    break Some(float);
                }
            }
        } else {
            numer >>= 1_usize;
            denom >>= 1_usize;
        }
    }
}
