//! keymask: reversible integer obfuscation and bit-packing over arbitrary
//! base-N alphabets.
//!
//! This library turns integers — single values or multi-field records —
//! into short, fixed-length strings over a chosen symbol alphabet, and
//! scrambles them so that sequential inputs do not produce recognizably
//! sequential outputs. The typical use is deriving compact public
//! identifiers from internal auto-increment keys.
//!
//! It is deliberately *not* a cipher: the scrambling is a bijective
//! multiplication modulo the key space, reversible by anyone who knows the
//! alphabet and multiplier. What it buys is unpredictability to outsiders,
//! not secrecy against insiders.
//!
//! # Architecture
//!
//! ```text
//! arith       (bignum primitives — gcd, modpow, modular inverse, isqrt)
//!     ↑
//! prime       (primality oracle + wheel-based next-prime search)
//!     ↑
//! obfuscator  (value ↔ fixed-length key, prime multiplier)
//!     ↑                ↑
//! packer ── schema     alphabet (base-N positional codec)
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: every fallible operation returns a structured error
//! - **Immutable values**: alphabets, schemas, and packers never change
//!   after construction; the obfuscator memoizes one derived value
//! - **Bounded latency**: number-theoretic inputs are capped at 512 bits
//! - **Deterministic**: a configuration always produces the same keys
//!
//! # Examples
//!
//! Obfuscate sequential IDs into fixed-length keys:
//!
//! ```
//! use keymask::{Alphabet, Obfuscator};
//! use keymask::alphabet::BASE58;
//! use num_bigint::BigUint;
//!
//! let obfuscator = Obfuscator::new(Alphabet::new(BASE58).unwrap(), 8);
//!
//! let key_1 = obfuscator.key(&BigUint::from(1001u32)).unwrap();
//! let key_2 = obfuscator.key(&BigUint::from(1002u32)).unwrap();
//! assert_eq!(key_1.chars().count(), 8);
//! assert_ne!(key_1, key_2);
//!
//! assert_eq!(obfuscator.value(&key_1).unwrap(), BigUint::from(1001u32));
//! ```
//!
//! Pack a structured record and expose it as one opaque key:
//!
//! ```
//! use std::collections::BTreeMap;
//! use keymask::{Alphabet, Field, Obfuscator, Packer, Schema};
//! use keymask::alphabet::BASE62;
//! use num_bigint::BigUint;
//!
//! let schema = Schema::new(vec![
//!     Field::new("user_id", 32),
//!     Field::new("region", 6),
//!     Field::new("kind", 2),
//! ]).unwrap();
//! let obfuscator = Obfuscator::new(Alphabet::new(BASE62).unwrap(), 12);
//! let packer = Packer::with_obfuscator(schema, obfuscator).unwrap();
//!
//! let mut record = BTreeMap::new();
//! record.insert("user_id".to_string(), BigUint::from(987_654u32));
//! record.insert("region".to_string(), BigUint::from(17u32));
//! record.insert("kind".to_string(), BigUint::from(2u32));
//!
//! let key = packer.pack_key(&record).unwrap();
//! assert_eq!(key.chars().count(), 12);
//! assert_eq!(packer.unpack_key(&key).unwrap(), record);
//! ```

pub mod alphabet;
pub mod arith;
pub mod error;
pub mod obfuscator;
pub mod packer;
pub mod prime;
pub mod schema;

// Re-export commonly used types
pub use alphabet::Alphabet;
pub use error::{Error, Result};
pub use obfuscator::Obfuscator;
pub use packer::{ByteOrder, Packer};
pub use schema::{Field, Schema};
