//! Primality testing and next-prime search.
//!
//! The oracle is exact below 2,000,000 (trial division) and a fixed-basis
//! strong-pseudoprime test above it. The fixed witness set has no known
//! counterexample at the sizes this library works with, but it is an
//! empirical bound, not a primality certificate.
//!
//! All entry points reject inputs wider than [`MAX_INPUT_BITS`] so the
//! worst-case latency of a single call stays bounded.
//!
//! # Example
//! ```
//! use keymask::prime;
//! use num_bigint::BigUint;
//!
//! assert!(prime::is_prime(&BigUint::from(97u32)).unwrap());
//! assert_eq!(prime::next_prime(&BigUint::from(9u32)).unwrap(), BigUint::from(11u32));
//! ```

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::arith;
use crate::error::{PrimeError, Result};

/// Ceiling on the bit width of primality-test inputs.
///
/// Larger inputs are rejected rather than processed slowly.
pub const MAX_INPUT_BITS: u64 = 512;

/// Product of the primes 2 through 17; sharing a factor with this is an
/// immediate compositeness witness for anything but the primes themselves.
const WHEEL_MODULUS: u32 = 510_510;

/// Below this bound primality is decided by exact trial division.
const TRIAL_DIVISION_BOUND: u64 = 2_000_000;

/// Fixed Miller-Rabin witness bases used above the trial-division bound.
const MILLER_RABIN_BASES: [u64; 4] = [2, 13, 23, 1_662_803];

/// Distance from `n mod 30` to the next residue coprime with 30, strictly
/// ahead of `n`. Stepping with this table skips all multiples of 2, 3, 5.
const WHEEL_GAPS: [u32; 30] = [
    1, 6, 5, 4, 3, 2, 1, 4, 3, 2, 1, 2, 1, 4, 3, 2, 1, 2, 1, 4, 3, 2, 1, 6, 5, 4, 3, 2, 1, 2,
];

fn check_width(n: &BigUint) -> Result<()> {
    if n.bits() > MAX_INPUT_BITS {
        return Err(PrimeError::InputTooWide {
            bits: n.bits(),
            max_bits: MAX_INPUT_BITS,
        }
        .into());
    }
    Ok(())
}

/// Primality oracle.
///
/// Dispatches through three tiers:
/// 1. small-prime screening against 2, 3, 5 and the factors of 510510,
/// 2. exact trial division for `n < 2,000,000`,
/// 3. a strong-pseudoprime test with bases `{2, 13, 23, 1662803}` beyond.
///
/// # Errors
/// Returns [`PrimeError::InputTooWide`] for inputs over [`MAX_INPUT_BITS`].
pub fn is_prime(n: &BigUint) -> Result<bool> {
    check_width(n)?;

    if let Some(small) = n.to_u32() {
        if small < 2 {
            return Ok(false);
        }
        if small == 2 || small == 3 || small == 5 {
            return Ok(true);
        }
    }
    if n.is_even() || (n % 3u32).is_zero() || (n % 5u32).is_zero() {
        return Ok(false);
    }

    // Anything sharing a factor with 2·3·5·7·11·13·17 at this point is a
    // multiple of 7, 11, 13, or 17.
    let wheel = arith::gcd(&BigInt::from(n.clone()), &BigInt::from(WHEEL_MODULUS));
    if !wheel.is_one() {
        return Ok(matches!(n.to_u32(), Some(7 | 11 | 13 | 17)));
    }

    match n.to_u64() {
        Some(small) if small < TRIAL_DIVISION_BOUND => {
            let mut divisor = 3u64;
            while divisor * divisor <= small {
                if small % divisor == 0 {
                    return Ok(false);
                }
                divisor += 2;
            }
            Ok(true)
        }
        _ => {
            for base in MILLER_RABIN_BASES {
                if !is_strong_pseudoprime(n, &BigUint::from(base))? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

/// Single-base strong-pseudoprime (Miller-Rabin) witness test.
///
/// Factors `n - 1 = 2^s * d` with `d` odd, computes `x = base^d mod n`,
/// and passes if `x` is `1` or `n - 1`, or if repeated squaring reaches
/// `n - 1` within `s - 1` steps. Reaching `1` any other way, or running
/// out of squarings, is a compositeness witness.
///
/// Meaningful for odd `n >= 3`; smaller inputs always fail.
///
/// # Errors
/// Returns [`PrimeError::InputTooWide`] for inputs over [`MAX_INPUT_BITS`].
pub fn is_strong_pseudoprime(n: &BigUint, base: &BigUint) -> Result<bool> {
    check_width(n)?;
    if *n < BigUint::from(3u32) {
        return Ok(false);
    }

    let n_int = BigInt::from(n.clone());
    let n_minus_1 = &n_int - BigInt::one();

    let mut d = n_minus_1.clone();
    let mut s = 0u64;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    let mut x = arith::mod_pow(&BigInt::from(base.clone()), &d, &n_int)?;
    if x.is_one() || x == n_minus_1 {
        return Ok(true);
    }
    for _ in 1..s {
        x = (&x * &x) % &n_int;
        if x == n_minus_1 {
            return Ok(true);
        }
        if x.is_one() {
            return Ok(false);
        }
    }
    Ok(false)
}

/// Smallest prime strictly greater than `n`.
///
/// Small inputs are answered directly; from 5 upward candidates advance
/// through the modulo-30 wheel, so multiples of 2, 3, and 5 are never
/// tested.
///
/// # Errors
/// Returns [`PrimeError::InputTooWide`] for inputs over [`MAX_INPUT_BITS`].
pub fn next_prime(n: &BigUint) -> Result<BigUint> {
    check_width(n)?;

    if *n < BigUint::from(2u32) {
        return Ok(BigUint::from(2u32));
    }
    if *n == BigUint::from(2u32) {
        return Ok(BigUint::from(3u32));
    }
    if *n <= BigUint::from(4u32) {
        return Ok(BigUint::from(5u32));
    }

    let mut candidate = n.clone();
    loop {
        let residue = (&candidate % 30u32).to_u32().unwrap_or(0) as usize;
        candidate += WHEEL_GAPS[residue];
        if is_prime(&candidate)? {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_is_prime_small_values() {
        assert!(!is_prime(&big(0)).unwrap());
        assert!(!is_prime(&big(1)).unwrap());
        assert!(is_prime(&big(2)).unwrap());
        assert!(is_prime(&big(3)).unwrap());
        assert!(!is_prime(&big(4)).unwrap());
        assert!(is_prime(&big(5)).unwrap());
        assert!(is_prime(&big(7)).unwrap());
        assert!(is_prime(&big(11)).unwrap());
        assert!(is_prime(&big(13)).unwrap());
        assert!(is_prime(&big(17)).unwrap());
        assert!(is_prime(&big(19)).unwrap());
    }

    #[test]
    fn test_is_prime_wheel_short_circuit() {
        // Multiples of 7, 11, 13, 17 that survive the 2/3/5 screen
        assert!(!is_prime(&big(49)).unwrap());
        assert!(!is_prime(&big(77)).unwrap());
        assert!(!is_prime(&big(91)).unwrap());
        assert!(!is_prime(&big(119)).unwrap());
    }

    #[test]
    fn test_is_prime_carmichael() {
        // 561 = 3 * 11 * 17 fools the plain Fermat test but not this oracle
        assert!(!is_prime(&big(561)).unwrap());
        // 252601 = 41 * 61 * 101 has no factor below 19
        assert!(!is_prime(&big(252_601)).unwrap());
    }

    #[test]
    fn test_is_prime_trial_division_range() {
        assert!(is_prime(&big(1_000_003)).unwrap());
        assert!(is_prime(&big(1_999_993)).unwrap());
        assert!(!is_prime(&big(1_999_999)).unwrap()); // 17 * 117647
    }

    #[test]
    fn test_is_prime_miller_rabin_range() {
        assert!(is_prime(&big(1_000_000_007)).unwrap());
        assert!(is_prime(&big(1_000_000_009)).unwrap());
        // 1000003 * 1000033
        assert!(!is_prime(&big(1_000_036_000_099)).unwrap());
        // Mersenne prime 2^61 - 1
        assert!(is_prime(&big(2_305_843_009_213_693_951)).unwrap());
    }

    #[test]
    fn test_strong_pseudoprime_2047() {
        // 2047 = 23 * 89 is the smallest strong pseudoprime to base 2;
        // the oracle still rejects it via trial division.
        assert!(is_strong_pseudoprime(&big(2047), &big(2)).unwrap());
        assert!(!is_prime(&big(2047)).unwrap());
    }

    #[test]
    fn test_strong_pseudoprime_true_prime() {
        for base in [2u64, 13, 23] {
            assert!(is_strong_pseudoprime(&big(1_000_000_007), &big(base)).unwrap());
        }
    }

    #[test]
    fn test_next_prime_small_cases() {
        assert_eq!(next_prime(&big(0)).unwrap(), big(2));
        assert_eq!(next_prime(&big(1)).unwrap(), big(2));
        assert_eq!(next_prime(&big(2)).unwrap(), big(3));
        assert_eq!(next_prime(&big(3)).unwrap(), big(5));
        assert_eq!(next_prime(&big(4)).unwrap(), big(5));
        assert_eq!(next_prime(&big(5)).unwrap(), big(7));
    }

    #[test]
    fn test_next_prime_wheel_stepping() {
        assert_eq!(next_prime(&big(9)).unwrap(), big(11));
        assert_eq!(next_prime(&big(30)).unwrap(), big(31));
        assert_eq!(next_prime(&big(31)).unwrap(), big(37));
        assert_eq!(next_prime(&big(89)).unwrap(), big(97));
        assert_eq!(next_prime(&big(7919)).unwrap(), big(7927));
    }

    #[test]
    fn test_next_prime_always_greater() {
        let mut p = big(0);
        for _ in 0..50 {
            let next = next_prime(&p).unwrap();
            assert!(next > p);
            assert!(is_prime(&next).unwrap());
            p = next;
        }
    }

    #[test]
    fn test_input_width_ceiling() {
        let wide = BigUint::one() << 513u32;
        assert!(matches!(
            is_prime(&wide),
            Err(Error::Prime(PrimeError::InputTooWide { bits: 514, .. }))
        ));
        assert!(matches!(
            next_prime(&wide),
            Err(Error::Prime(PrimeError::InputTooWide { .. }))
        ));
        // Exactly 512 bits is still accepted at the entry point, but every
        // candidate above 2^512 - 1 trips the ceiling during the search.
        let edge = (BigUint::one() << 512u32) - 1u32;
        assert!(matches!(
            next_prime(&edge),
            Err(Error::Prime(PrimeError::InputTooWide { .. }))
        ));
    }

    #[test]
    fn test_next_prime_wide_input() {
        let n = BigUint::one() << 511u32;
        let p = next_prime(&n).unwrap();
        assert!(p > n);
        assert!(is_prime(&p).unwrap());
    }
}
