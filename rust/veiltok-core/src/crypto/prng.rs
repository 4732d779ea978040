//! PRNG utilities for the crypto primitives.
//!
//! See the [crypto module] documentation since this is a private module anyways.
//!
//! [crypto module]: crate::crypto

use num::{bigint::BigUint, traits::identities::Zero};
use rand::RngCore;
use rand_chacha::ChaCha20Rng;

/// Generates a secure pseudo-random integer.
///
/// Draws from a uniform distribution over the integers between zero (included) and
/// `max_int` (excluded). Employs the `ChaCha20` stream cipher as a PRNG.
pub fn generate_integer(prng: &mut ChaCha20Rng, max_int: &BigUint) -> BigUint {
    if max_int.is_zero() {
        return BigUint::zero();
    }
    let mut bytes = max_int.to_bytes_le();
    let mut rand_int = max_int.clone();
    while &rand_int >= max_int {
        prng.fill_bytes(&mut bytes);
        rand_int = BigUint::from_bytes_le(&bytes);
    }
    rand_int
}

/// Generates a pseudo-random float in the interval `[-1, 1)`.
///
/// Uses the upper 24 bits of a `u32` drawn from the `ChaCha20` stream, so every value is exactly
/// representable as an `f32`.
pub fn generate_unit_float(prng: &mut ChaCha20Rng) -> f32 {
    let bits = prng.next_u32() >> 8;
    (bits as f32 / (1_u32 << 23) as f32) - 1.0
}
