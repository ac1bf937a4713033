//! Arbitrary-precision arithmetic primitives.
//!
//! Pure functions over [`BigInt`] used by the primality oracle and the
//! obfuscation transform: gcd, floor division, integer square root, bit
//! length, exponentiation, and modular inverse. All results are exact;
//! nothing here rounds through floating point.
//!
//! # Sign Conventions
//! - [`gcd`] works on absolute values and is always non-negative.
//! - [`floor_divmod`] uses floor-division semantics: the remainder takes
//!   the sign of the divisor.
//! - [`mod_pow`] and [`mod_inverse`] reduce results into `[0, m)` for a
//!   positive modulus `m`.
//!
//! # Example
//! ```
//! use keymask::arith;
//! use num_bigint::BigInt;
//!
//! let (q, r) = arith::floor_divmod(&BigInt::from(-7), &BigInt::from(3)).unwrap();
//! assert_eq!((q, r), (BigInt::from(-3), BigInt::from(2)));
//!
//! let inv = arith::mod_inverse(&BigInt::from(3), &BigInt::from(7)).unwrap();
//! assert_eq!(inv, BigInt::from(5));
//! ```

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{ArithError, Result};

/// Greatest common divisor via the Euclidean algorithm.
///
/// Operates on absolute values, so the result is always non-negative.
/// `gcd(0, 0)` is defined as `0`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Floor-division quotient and remainder.
///
/// The remainder has the same sign as the divisor (or is zero), matching
/// floor-division semantics rather than truncation.
///
/// # Errors
/// Returns [`ArithError::ZeroDivisor`] if `b` is zero.
pub fn floor_divmod(a: &BigInt, b: &BigInt) -> Result<(BigInt, BigInt)> {
    if b.is_zero() {
        return Err(ArithError::ZeroDivisor.into());
    }
    let (mut q, mut r) = a.div_rem(b);
    // div_rem truncates toward zero; shift one step when the remainder
    // ended up on the wrong side of zero.
    if !r.is_zero() && r.sign() != b.sign() {
        q -= 1;
        r += b;
    }
    Ok((q, r))
}

/// Remainder of floor division for a known non-zero modulus.
///
/// Invariant: `m` is non-zero. The result has the sign of `m` or is zero.
fn rem_floor(a: &BigInt, m: &BigInt) -> BigInt {
    let r = a % m;
    if !r.is_zero() && r.sign() != m.sign() {
        r + m
    } else {
        r
    }
}

/// Integer square root by Newton refinement.
///
/// The iteration is seeded from `1 << ceil(bit_length(n) / 2)`, which is
/// always at least the true root, and converges monotonically downward.
///
/// # Errors
/// Returns [`ArithError::NegativeValue`] for negative `n`.
pub fn isqrt(n: &BigInt) -> Result<BigInt> {
    if n.is_negative() {
        return Err(ArithError::NegativeValue { value: n.clone() }.into());
    }
    if n.is_zero() {
        return Ok(BigInt::zero());
    }
    let seed_bits = (n.bits() + 1) / 2;
    let mut x = BigInt::one() << seed_bits;
    loop {
        let y: BigInt = (&x + n / &x) >> 1u32;
        if y >= x {
            return Ok(x);
        }
        x = y;
    }
}

/// Number of bits needed to represent a non-negative integer.
///
/// `bit_length(0)` is `0`.
///
/// # Errors
/// Returns [`ArithError::NegativeValue`] for negative `n`.
pub fn bit_length(n: &BigInt) -> Result<u64> {
    if n.is_negative() {
        return Err(ArithError::NegativeValue { value: n.clone() }.into());
    }
    Ok(n.bits())
}

/// Exact (unbounded) exponentiation by squaring.
///
/// `base^0` is `1`, including `0^0`.
///
/// # Errors
/// Returns [`ArithError::NegativeExponent`] for a negative exponent.
pub fn pow(base: &BigInt, exponent: &BigInt) -> Result<BigInt> {
    if exponent.is_negative() {
        return Err(ArithError::NegativeExponent {
            exponent: exponent.clone(),
        }
        .into());
    }
    let mut result = BigInt::one();
    let mut base = base.clone();
    let mut exp = exponent.clone();
    while !exp.is_zero() {
        if exp.is_odd() {
            result = &result * &base;
        }
        exp >>= 1u32;
        if !exp.is_zero() {
            base = &base * &base;
        }
    }
    Ok(result)
}

/// Modular exponentiation by squaring.
///
/// A negative base is normalized into `[0, modulus)` before exponentiation,
/// so for a positive modulus the result is always in `[0, modulus)`.
/// A modulus of `1` always yields `0`. `base^0` is `1 mod modulus`,
/// including `0^0`.
///
/// # Errors
/// - [`ArithError::NegativeExponent`] for a negative exponent
/// - [`ArithError::ZeroModulus`] for a zero modulus
pub fn mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt> {
    if exponent.is_negative() {
        return Err(ArithError::NegativeExponent {
            exponent: exponent.clone(),
        }
        .into());
    }
    if modulus.is_zero() {
        return Err(ArithError::ZeroModulus.into());
    }
    let mut result = rem_floor(&BigInt::one(), modulus);
    let mut base = rem_floor(base, modulus);
    let mut exp = exponent.clone();
    while !exp.is_zero() {
        if exp.is_odd() {
            result = rem_floor(&(&result * &base), modulus);
        }
        exp >>= 1u32;
        if !exp.is_zero() {
            base = rem_floor(&(&base * &base), modulus);
        }
    }
    Ok(result)
}

/// Modular inverse via the iterative extended Euclidean algorithm.
///
/// Returns the unique `x` in `[0, m)` with `(a * x) mod m == 1`.
///
/// # Errors
/// - [`ArithError::NonPositiveModulus`] unless `m > 0`
/// - [`ArithError::NotInvertible`] unless `gcd(a mod m, m) == 1`
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Result<BigInt> {
    if !m.is_positive() {
        return Err(ArithError::NonPositiveModulus { modulus: m.clone() }.into());
    }
    let mut old_r = rem_floor(a, m);
    let mut r = m.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();
    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }
    // old_r is gcd(a mod m, m); the modulus m == 1 case lands here with
    // old_r == 1 and an inverse of 0.
    if !old_r.is_one() {
        return Err(ArithError::NotInvertible {
            value: a.clone(),
            modulus: m.clone(),
        }
        .into());
    }
    Ok(rem_floor(&old_s, m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_gcd_basic() {
        assert_eq!(gcd(&BigInt::from(12), &BigInt::from(18)), BigInt::from(6));
        assert_eq!(gcd(&BigInt::from(17), &BigInt::from(5)), BigInt::from(1));
        assert_eq!(gcd(&BigInt::from(0), &BigInt::from(7)), BigInt::from(7));
        assert_eq!(gcd(&BigInt::from(7), &BigInt::from(0)), BigInt::from(7));
        assert_eq!(gcd(&BigInt::from(0), &BigInt::from(0)), BigInt::from(0));
    }

    #[test]
    fn test_gcd_negative_operands() {
        assert_eq!(gcd(&BigInt::from(-12), &BigInt::from(18)), BigInt::from(6));
        assert_eq!(gcd(&BigInt::from(12), &BigInt::from(-18)), BigInt::from(6));
        assert_eq!(gcd(&BigInt::from(-12), &BigInt::from(-18)), BigInt::from(6));
    }

    #[test]
    fn test_floor_divmod_sign_table() {
        let cases = [
            (7, 3, 2, 1),
            (-7, 3, -3, 2),
            (7, -3, -3, -2),
            (-7, -3, 2, -1),
            (6, 3, 2, 0),
            (-6, 3, -2, 0),
        ];
        for (a, b, q, r) in cases {
            let (got_q, got_r) = floor_divmod(&BigInt::from(a), &BigInt::from(b)).unwrap();
            assert_eq!(got_q, BigInt::from(q), "quotient of {} / {}", a, b);
            assert_eq!(got_r, BigInt::from(r), "remainder of {} / {}", a, b);
        }
    }

    #[test]
    fn test_floor_divmod_zero_divisor() {
        let result = floor_divmod(&BigInt::from(1), &BigInt::from(0));
        assert!(matches!(result, Err(Error::Arith(ArithError::ZeroDivisor))));
    }

    #[test]
    fn test_isqrt_small_values() {
        for (n, root) in [(0, 0), (1, 1), (2, 1), (3, 1), (4, 2), (15, 3), (16, 4)] {
            assert_eq!(isqrt(&BigInt::from(n)).unwrap(), BigInt::from(root));
        }
    }

    #[test]
    fn test_isqrt_large_value() {
        // 10^20 has an exact root of 10^10
        let n = pow(&BigInt::from(10), &BigInt::from(20)).unwrap();
        assert_eq!(isqrt(&n).unwrap(), BigInt::from(10_000_000_000u64));
        // One less must round down
        assert_eq!(
            isqrt(&(n - 1)).unwrap(),
            BigInt::from(9_999_999_999u64)
        );
    }

    #[test]
    fn test_isqrt_negative() {
        let result = isqrt(&BigInt::from(-1));
        assert!(matches!(
            result,
            Err(Error::Arith(ArithError::NegativeValue { .. }))
        ));
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(&BigInt::from(0)).unwrap(), 0);
        assert_eq!(bit_length(&BigInt::from(1)).unwrap(), 1);
        assert_eq!(bit_length(&BigInt::from(255)).unwrap(), 8);
        assert_eq!(bit_length(&BigInt::from(256)).unwrap(), 9);
        assert!(matches!(
            bit_length(&BigInt::from(-1)),
            Err(Error::Arith(ArithError::NegativeValue { .. }))
        ));
    }

    #[test]
    fn test_pow_exact() {
        assert_eq!(
            pow(&BigInt::from(2), &BigInt::from(10)).unwrap(),
            BigInt::from(1024)
        );
        assert_eq!(pow(&BigInt::from(0), &BigInt::from(0)).unwrap(), BigInt::one());
        assert_eq!(
            pow(&BigInt::from(-3), &BigInt::from(3)).unwrap(),
            BigInt::from(-27)
        );
        assert!(matches!(
            pow(&BigInt::from(2), &BigInt::from(-1)),
            Err(Error::Arith(ArithError::NegativeExponent { .. }))
        ));
    }

    #[test]
    fn test_mod_pow_matches_naive() {
        for base in -3i64..=3 {
            for exp in 0u32..=8 {
                for modulus in 1i64..=9 {
                    let expected = {
                        let mut acc = BigInt::one();
                        for _ in 0..exp {
                            acc *= base;
                        }
                        rem_floor(&acc, &BigInt::from(modulus))
                    };
                    let got = mod_pow(
                        &BigInt::from(base),
                        &BigInt::from(exp),
                        &BigInt::from(modulus),
                    )
                    .unwrap();
                    assert_eq!(got, expected, "{}^{} mod {}", base, exp, modulus);
                }
            }
        }
    }

    #[test]
    fn test_mod_pow_edge_cases() {
        // modulus 1 collapses everything to 0
        assert_eq!(
            mod_pow(&BigInt::from(5), &BigInt::from(3), &BigInt::from(1)).unwrap(),
            BigInt::zero()
        );
        // negative base normalized before exponentiation
        assert_eq!(
            mod_pow(&BigInt::from(-2), &BigInt::from(3), &BigInt::from(5)).unwrap(),
            BigInt::from(2)
        );
        assert!(matches!(
            mod_pow(&BigInt::from(2), &BigInt::from(3), &BigInt::from(0)),
            Err(Error::Arith(ArithError::ZeroModulus))
        ));
    }

    #[test]
    fn test_mod_inverse_round_trip() {
        let m = BigInt::from(97);
        for a in 1i64..97 {
            let inv = mod_inverse(&BigInt::from(a), &m).unwrap();
            assert_eq!(rem_floor(&(BigInt::from(a) * inv), &m), BigInt::one());
        }
    }

    #[test]
    fn test_mod_inverse_not_invertible() {
        let result = mod_inverse(&BigInt::from(2), &BigInt::from(4));
        assert!(matches!(
            result,
            Err(Error::Arith(ArithError::NotInvertible { .. }))
        ));
        let result = mod_inverse(&BigInt::from(0), &BigInt::from(7));
        assert!(matches!(
            result,
            Err(Error::Arith(ArithError::NotInvertible { .. }))
        ));
    }

    #[test]
    fn test_mod_inverse_negative_operand() {
        // -3 mod 7 == 4, whose inverse is 2
        assert_eq!(
            mod_inverse(&BigInt::from(-3), &BigInt::from(7)).unwrap(),
            BigInt::from(2)
        );
    }

    #[test]
    fn test_mod_inverse_bad_modulus() {
        assert!(matches!(
            mod_inverse(&BigInt::from(3), &BigInt::from(0)),
            Err(Error::Arith(ArithError::NonPositiveModulus { .. }))
        ));
        assert!(matches!(
            mod_inverse(&BigInt::from(3), &BigInt::from(-7)),
            Err(Error::Arith(ArithError::NonPositiveModulus { .. }))
        ));
    }
}
