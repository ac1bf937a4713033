//! Reversible obfuscation of bounded integers into fixed-length keys.
//!
//! An [`Obfuscator`] maps every value in `[0, base^key_length - 1]` to a
//! distinct key of exactly `key_length` alphabet symbols. The mapping
//! multiplies by an odd multiplier modulo the range size, so numerically
//! adjacent inputs land far apart in the output space, and is undone with
//! the multiplier's modular inverse.
//!
//! This is obscurity, not cryptography: anyone holding the alphabet and
//! multiplier can reverse a key.
//!
//! # Multiplier Choice
//!
//! When no multiplier is supplied, one is synthesized deterministically
//! from the configuration: the smallest prime above `maximum_value * φ`
//! (golden ratio, applied as integer fixed-point so no floating error
//! creeps in). A prime that size cannot share a factor with the range, so
//! the transform is always invertible. A caller-supplied multiplier is
//! checked for oddness only; if it shares a factor with the range size,
//! decoding fails at the modular-inverse step rather than at construction.
//!
//! # Example
//! ```
//! use keymask::{Alphabet, Obfuscator};
//! use keymask::alphabet::BASE62;
//! use num_bigint::BigUint;
//!
//! let obfuscator = Obfuscator::new(Alphabet::new(BASE62).unwrap(), 8);
//! let key = obfuscator.key(&BigUint::from(12345u32)).unwrap();
//! assert_eq!(key.chars().count(), 8);
//! assert_eq!(obfuscator.value(&key).unwrap(), BigUint::from(12345u32));
//! ```

use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Zero;

use crate::alphabet::Alphabet;
use crate::arith;
use crate::error::{ObfuscatorError, Result};
use crate::prime;

/// Golden ratio as fixed-point numerator over [`GOLDEN_RATIO_DEN`].
const GOLDEN_RATIO_NUM: u64 = 1_618_033_988_749_894_848;
const GOLDEN_RATIO_DEN: u64 = 1_000_000_000_000_000_000;

/// Bijective integer-to-key transform over a fixed alphabet and key length.
///
/// Immutable after construction except for the memoized multiplier, which
/// is computed on first use when not supplied and never changes afterward.
#[derive(Debug)]
pub struct Obfuscator {
    alphabet: Alphabet,
    key_length: usize,
    maximum_value: BigUint,
    multiplier: OnceLock<BigUint>,
}

impl Obfuscator {
    /// Create an obfuscator that synthesizes its own prime multiplier on
    /// first use.
    pub fn new(alphabet: Alphabet, key_length: usize) -> Self {
        let maximum_value = alphabet.max_value(key_length);
        Self {
            alphabet,
            key_length,
            maximum_value,
            multiplier: OnceLock::new(),
        }
    }

    /// Create an obfuscator with a caller-chosen multiplier.
    ///
    /// Only oddness is verified here. A multiplier that shares a factor
    /// with `maximum_value + 1` produces keys that cannot be decoded: the
    /// failure surfaces from [`value`](Self::value) as a not-invertible
    /// arithmetic error.
    ///
    /// # Errors
    /// Returns [`ObfuscatorError::EvenMultiplier`] for an even multiplier.
    pub fn with_multiplier(
        alphabet: Alphabet,
        key_length: usize,
        multiplier: BigUint,
    ) -> Result<Self> {
        if multiplier.is_even() {
            return Err(ObfuscatorError::EvenMultiplier { multiplier }.into());
        }
        let maximum_value = alphabet.max_value(key_length);
        let cell = OnceLock::new();
        let _ = cell.set(multiplier);
        Ok(Self {
            alphabet,
            key_length,
            maximum_value,
            multiplier: cell,
        })
    }

    /// The alphabet this obfuscator encodes into.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Fixed length of every generated key, in symbols.
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// Largest obfuscatable value: `base^key_length - 1`.
    pub fn maximum_value(&self) -> &BigUint {
        &self.maximum_value
    }

    /// The multiplier in use, synthesizing and caching it if necessary.
    ///
    /// Deterministic for a given alphabet and key length. Concurrent first
    /// calls may race to compute the same value; the first result is kept.
    ///
    /// # Errors
    /// Propagates a prime-search error when the synthesized target exceeds
    /// the primality bit ceiling.
    pub fn multiplier(&self) -> Result<&BigUint> {
        if let Some(multiplier) = self.multiplier.get() {
            return Ok(multiplier);
        }
        let target = golden_target(&self.maximum_value);
        let synthesized = prime::next_prime(&target)?;
        Ok(self.multiplier.get_or_init(|| synthesized))
    }

    /// Obfuscate a value into a key of exactly `key_length` symbols.
    ///
    /// Zero maps to the all-zero-symbol key directly (its plain encoding
    /// would be empty); everything else is multiplied modulo
    /// `maximum_value + 1`, encoded, and left-padded with the zero symbol.
    ///
    /// # Errors
    /// Returns [`ObfuscatorError::ValueOutOfRange`] when
    /// `value > maximum_value`.
    pub fn key(&self, value: &BigUint) -> Result<String> {
        if value > &self.maximum_value {
            return Err(ObfuscatorError::ValueOutOfRange {
                value: value.clone(),
                max: self.maximum_value.clone(),
            }
            .into());
        }
        let zero = self.alphabet.zero_symbol();
        if value.is_zero() {
            return Ok(std::iter::repeat(zero).take(self.key_length).collect());
        }
        let multiplier = self.multiplier()?;
        let range = &self.maximum_value + 1u32;
        let raw = value * multiplier % range;
        let encoded = self.alphabet.encode(&raw);
        let padding = self.key_length - encoded.chars().count();
        let mut key = String::with_capacity(self.key_length);
        key.extend(std::iter::repeat(zero).take(padding));
        key.push_str(&encoded);
        Ok(key)
    }

    /// Reverse a key back to its original value.
    ///
    /// # Errors
    /// - [`ObfuscatorError::KeyLengthMismatch`] unless the key has exactly
    ///   `key_length` characters
    /// - an alphabet error for symbols outside the alphabet
    /// - a not-invertible arithmetic error when a caller-supplied
    ///   multiplier shares a factor with `maximum_value + 1`
    pub fn value(&self, key: &str) -> Result<BigUint> {
        let actual = key.chars().count();
        if actual != self.key_length {
            return Err(ObfuscatorError::KeyLengthMismatch {
                expected: self.key_length,
                actual,
            }
            .into());
        }
        let zero = self.alphabet.zero_symbol();
        if key.chars().all(|symbol| symbol == zero) {
            return Ok(BigUint::zero());
        }
        let raw = self.alphabet.decode(key)?;
        let multiplier = self.multiplier()?;
        let range = &self.maximum_value + 1u32;
        let inverse = arith::mod_inverse(
            &BigInt::from(multiplier.clone()),
            &BigInt::from(range.clone()),
        )?;
        // mod_inverse reduces into [0, range), so the sign is non-negative
        let inverse = inverse.to_biguint().unwrap();
        Ok(raw * inverse % range)
    }
}

/// `round(maximum_value * φ)` in integer fixed-point, round half up.
fn golden_target(maximum_value: &BigUint) -> BigUint {
    (maximum_value * GOLDEN_RATIO_NUM + GOLDEN_RATIO_DEN / 2) / GOLDEN_RATIO_DEN
}
