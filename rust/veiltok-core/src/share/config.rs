//! Sharing configurations.
//!
//! See the [share module] documentation since this is a private module anyways.
//!
//! [share module]: crate::share

use num::{
    bigint::{BigInt, BigUint},
    rational::Ratio,
    traits::{pow::Pow, One},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The maximal number of decimal places that can be preserved.
pub const MAX_PRECISION: u8 = 12;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid sharing configuration: precision {0} exceeds the maximum of 12")]
/// Errors related to invalid sharing configurations.
pub struct InvalidShareConfigError(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
/// The absolute bounds of the values to be shared.
pub enum BoundType {
    /// Values absolutely bounded by 1.
    B0 = 0,
    /// Values absolutely bounded by 100.
    B2 = 2,
    /// Values absolutely bounded by 10_000.
    B4 = 4,
    /// Values absolutely bounded by 1_000_000.
    B6 = 6,
}

impl BoundType {
    /// Gets the absolute bound.
    pub fn bound(&self) -> u64 {
        10_u64.pow(*self as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
/// The number of shared vectors that may be summed at most.
pub enum SummandType {
    /// At most 1_000 vectors may be summed.
    S3 = 3,
    /// At most 1_000_000 vectors may be summed.
    S6 = 6,
    /// At most 1_000_000_000 vectors may be summed.
    S9 = 9,
}

impl SummandType {
    /// Gets the maximal number of summands.
    pub fn max_summands(&self) -> u64 {
        10_u64.pow(*self as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A sharing configuration.
///
/// Values are clamped to `[-bound, bound]`, shifted into the non-negative reals, scaled by
/// `10^precision` and truncated to integers, which are then embedded into the finite group
/// `Z / order` where `order` is a power of two large enough to hold the sum of `max_summands`
/// encoded values without wrapping around.
pub struct ShareConfig {
    /// The absolute bound of the shared values.
    pub bound_type: BoundType,
    /// The number of preserved decimal places.
    pub precision: u8,
    /// The maximal number of summands.
    pub summand_type: SummandType,
}

impl ShareConfig {
    /// Creates a sharing configuration.
    ///
    /// # Errors
    /// Fails if the precision exceeds [`MAX_PRECISION`].
    pub fn new(
        bound_type: BoundType,
        precision: u8,
        summand_type: SummandType,
    ) -> Result<Self, InvalidShareConfigError> {
        if precision > MAX_PRECISION {
            return Err(InvalidShareConfigError(precision));
        }
        Ok(Self {
            bound_type,
            precision,
            summand_type,
        })
    }

    /// Gets the additive shift, i.e. the absolute bound of the values.
    pub fn add_shift(&self) -> Ratio<BigInt> {
        Ratio::from_integer(BigInt::from(self.bound_type.bound()))
    }

    /// Gets the exponential shift, i.e. the fixed-point scaling factor.
    pub fn exp_shift(&self) -> BigInt {
        BigInt::from(10_u8).pow(self.precision as u32)
    }

    /// Gets the maximal number of summands.
    pub fn max_summands(&self) -> u64 {
        self.summand_type.max_summands()
    }

    /// Gets the order of the finite group.
    ///
    /// This is the smallest power of two that is strictly larger than the largest possible sum of
    /// `max_summands` encoded values.
    pub fn order(&self) -> BigUint {
        let max_element = BigUint::from(2 * self.bound_type.bound())
            * BigUint::from(10_u8).pow(self.precision as u32)
            * BigUint::from(self.max_summands());
        let bits = max_element.bits();
        BigUint::one() << bits as usize
    }

    /// Gets the number of bytes needed to represent the largest element of the finite group.
    pub fn element_len(&self) -> usize {
        (self.order() - BigUint::one()).to_bytes_le().len()
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            bound_type: BoundType::B0,
            precision: 10,
            summand_type: SummandType::S3,
        }
    }
}

#[cfg(test)]
mod tests {
    use num::traits::Zero;

    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(BoundType::B0.bound(), 1);
        assert_eq!(BoundType::B2.bound(), 100);
        assert_eq!(BoundType::B4.bound(), 10_000);
        assert_eq!(BoundType::B6.bound(), 1_000_000);
        assert_eq!(SummandType::S3.max_summands(), 1_000);
        assert_eq!(SummandType::S9.max_summands(), 1_000_000_000);
    }

    #[test]
    fn test_order_is_power_of_two_above_max_sum() {
        let config = ShareConfig::default();
        let order = config.order();
        // 2 * 1 * 10^10 * 10^3 = 2 * 10^13 < 2^45
        assert_eq!(order, BigUint::one() << 45_usize);
        assert!((&order & (&order - BigUint::one())).is_zero());
        let max_sum = BigUint::from(2_u64 * 10_u64.pow(13));
        assert!(max_sum < order);
        assert!(max_sum >= order.clone() >> 1_usize);
        assert_eq!(config.element_len(), 6);
    }

    #[test]
    fn test_shifts() {
        let config = ShareConfig::new(BoundType::B2, 3, SummandType::S6).unwrap();
        assert_eq!(config.add_shift(), Ratio::from_integer(BigInt::from(100)));
        assert_eq!(config.exp_shift(), BigInt::from(1_000));
        assert_eq!(config.max_summands(), 1_000_000);
    }

    #[test]
    fn test_invalid_precision() {
        assert_eq!(
            ShareConfig::new(BoundType::B0, 13, SummandType::S3),
            Err(InvalidShareConfigError(13))
        );
        assert!(ShareConfig::new(BoundType::B0, MAX_PRECISION, SummandType::S3).is_ok());
    }
}
