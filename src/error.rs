//! Error types for the keymask library.
//!
//! Every operation returns a structured error rather than panicking.
//! Errors carry the offending values so callers can report precisely
//! what went wrong without re-deriving context.

use num_bigint::{BigInt, BigUint};
use thiserror::Error;

/// Top-level error type for all operations in the library.
///
/// Each variant corresponds to a specific failure domain:
/// - Arith: arbitrary-precision arithmetic primitives
/// - Prime: primality testing and prime search
/// - Alphabet: symbol set construction and base-N codec
/// - Obfuscator: key generation and reversal
/// - Schema: field layout validation
/// - Packer: packing/unpacking structured values
#[derive(Debug, Error)]
pub enum Error {
    /// Arithmetic primitive failed (e.g., division by zero, negative domain)
    #[error("arithmetic error: {0}")]
    Arith(#[from] ArithError),

    /// Primality oracle or prime search failed (e.g., input over the bit ceiling)
    #[error("prime error: {0}")]
    Prime(#[from] PrimeError),

    /// Alphabet construction or symbol lookup failed
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    /// Obfuscation transform failed (e.g., value out of range, bad multiplier)
    #[error("obfuscator error: {0}")]
    Obfuscator(#[from] ObfuscatorError),

    /// Schema validation failed (e.g., duplicate field, value overflow)
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Packer operation failed (e.g., missing obfuscator, byte length mismatch)
    #[error("packer error: {0}")]
    Packer(#[from] PackerError),
}

/// Arbitrary-precision arithmetic errors.
#[derive(Debug, Error)]
pub enum ArithError {
    /// Division or modulo by zero
    #[error("division by zero")]
    ZeroDivisor,

    /// Operation is undefined for negative input
    #[error("negative value out of domain: {value}")]
    NegativeValue { value: BigInt },

    /// Exponent must be non-negative
    #[error("negative exponent: {exponent}")]
    NegativeExponent { exponent: BigInt },

    /// Modular exponentiation requires a non-zero modulus
    #[error("zero modulus")]
    ZeroModulus,

    /// Modular inverse requires a positive modulus
    #[error("modulus must be positive: {modulus}")]
    NonPositiveModulus { modulus: BigInt },

    /// No modular inverse exists (operand shares a factor with the modulus)
    #[error("{value} is not invertible modulo {modulus}")]
    NotInvertible { value: BigInt, modulus: BigInt },
}

/// Primality oracle and prime search errors.
#[derive(Debug, Error)]
pub enum PrimeError {
    /// Input exceeds the latency-bounding bit ceiling
    #[error("input of {bits} bits exceeds the {max_bits}-bit ceiling")]
    InputTooWide { bits: u64, max_bits: u64 },
}

/// Alphabet construction and lookup errors.
#[derive(Debug, Error)]
pub enum AlphabetError {
    /// Positional encoding needs at least two symbols
    #[error("alphabet needs at least 2 symbols, got {count}")]
    TooFewSymbols { count: usize },

    /// The same symbol appears twice in the alphabet
    #[error("duplicate symbol {symbol:?} at index {index}")]
    DuplicateSymbol { symbol: char, index: usize },

    /// A character is not part of the alphabet
    #[error("unknown symbol {symbol:?}")]
    UnknownSymbol { symbol: char },

    /// Digit index is outside [0, base)
    #[error("index {index} out of range for base {base}")]
    IndexOutOfRange { index: usize, base: usize },
}

/// Obfuscation transform errors.
#[derive(Debug, Error)]
pub enum ObfuscatorError {
    /// The multiplier must be odd to be invertible modulo an even range
    #[error("multiplier must be odd, got {multiplier}")]
    EvenMultiplier { multiplier: BigUint },

    /// Value exceeds the maximum encodable in the configured key length
    #[error("value {value} exceeds maximum {max}")]
    ValueOutOfRange { value: BigUint, max: BigUint },

    /// Key has the wrong number of characters
    #[error("key length mismatch: expected {expected} characters, got {actual}")]
    KeyLengthMismatch { expected: usize, actual: usize },
}

/// Schema layout and value validation errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Field name is empty
    #[error("field {index} has an empty name")]
    EmptyFieldName { index: usize },

    /// Field name is not identifier-like
    #[error("field {index} has invalid name {name:?}")]
    InvalidFieldName { index: usize, name: String },

    /// Field has a zero bit width
    #[error("field {index} ({name:?}) has zero bit width")]
    ZeroBitWidth { index: usize, name: String },

    /// Field name appears more than once
    #[error("field {index} ({name:?}) duplicates an earlier field")]
    DuplicateFieldName { index: usize, name: String },

    /// Provided value names don't exactly match the schema's field names
    #[error("field set mismatch: missing {missing:?}, extra {extra:?}")]
    FieldSetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// A field value doesn't fit in its bit width
    #[error("value {value} for field {field:?} exceeds {bits}-bit maximum {max}")]
    ValueOverflow {
        field: String,
        value: BigUint,
        bits: u32,
        max: BigUint,
    },
}

/// Packing and unpacking errors.
#[derive(Debug, Error)]
pub enum PackerError {
    /// Obfuscated form requested but no obfuscator is configured
    #[error("no obfuscator configured")]
    ObfuscatorRequired,

    /// The schema can produce values the obfuscator cannot represent
    #[error("schema maximum {schema_max} exceeds obfuscator maximum {obfuscator_max}")]
    SchemaTooWide {
        schema_max: BigUint,
        obfuscator_max: BigUint,
    },

    /// A packed integer is wider than the schema's total bit width
    #[error("packed value {value} exceeds schema maximum {max}")]
    PackedValueTooLarge { value: BigUint, max: BigUint },

    /// Byte sequence has the wrong width for this schema
    #[error("byte length mismatch: expected {expected} bytes, got {actual}")]
    ByteLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
