//! Packing structured field values into integers, keys, and bytes.
//!
//! A [`Packer`] combines a [`Schema`] with an optional [`Obfuscator`].
//! Values pack into a single integer by shifting each field to its offset;
//! the integer can then surface as-is, as a fixed-length obfuscated key,
//! or as a fixed-width byte sequence in either endianness.
//!
//! ```text
//! {id: 100, type: 2, flag: 1}
//!         | pack                         schema [id:10][type:2][flag:1]
//!         v
//! 100 << 3  |  2 << 1  |  1   =  805
//!         | key / bytes
//!         v
//! "2rP"  or  [0x03, 0x25]
//! ```
//!
//! # Example
//! ```
//! use std::collections::BTreeMap;
//! use keymask::{Field, Packer, Schema};
//! use num_bigint::BigUint;
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", 10),
//!     Field::new("type", 2),
//!     Field::new("flag", 1),
//! ]).unwrap();
//! let packer = Packer::new(schema);
//!
//! let mut values = BTreeMap::new();
//! values.insert("id".to_string(), BigUint::from(100u32));
//! values.insert("type".to_string(), BigUint::from(2u32));
//! values.insert("flag".to_string(), BigUint::from(1u32));
//!
//! let packed = packer.pack(&values).unwrap();
//! assert_eq!(packed, BigUint::from(805u32));
//! assert_eq!(packer.unpack(&packed).unwrap(), values);
//! ```

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{PackerError, Result};
use crate::obfuscator::Obfuscator;
use crate::schema::{Field, Schema};

/// Byte order for the fixed-width byte form of a packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

/// Packs and unpacks field maps against a schema.
#[derive(Debug)]
pub struct Packer {
    schema: Schema,
    obfuscator: Option<Obfuscator>,
}

impl Packer {
    /// Create a packer without obfuscation.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            obfuscator: None,
        }
    }

    /// Create a packer straight from a field list.
    ///
    /// # Errors
    /// Propagates schema validation errors.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        Ok(Self::new(Schema::new(fields)?))
    }

    /// Create a packer whose key form runs through an obfuscator.
    ///
    /// # Errors
    /// Returns [`PackerError::SchemaTooWide`] when the schema can produce
    /// values beyond the obfuscator's range.
    pub fn with_obfuscator(schema: Schema, obfuscator: Obfuscator) -> Result<Self> {
        if schema.maximum_value() > obfuscator.maximum_value() {
            return Err(PackerError::SchemaTooWide {
                schema_max: schema.maximum_value().clone(),
                obfuscator_max: obfuscator.maximum_value().clone(),
            }
            .into());
        }
        Ok(Self {
            schema,
            obfuscator: Some(obfuscator),
        })
    }

    /// The schema this packer validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Pack a value map into a single integer.
    ///
    /// # Errors
    /// Propagates schema validation errors (field set mismatch, overflow).
    pub fn pack(&self, values: &BTreeMap<String, BigUint>) -> Result<BigUint> {
        self.schema.validate_values(values)?;
        let mut packed = BigUint::zero();
        for (field, shift) in self.schema.layout() {
            packed |= &values[&field.name] << shift;
        }
        Ok(packed)
    }

    /// Pack a value map into an obfuscated fixed-length key.
    ///
    /// # Errors
    /// Returns [`PackerError::ObfuscatorRequired`] when no obfuscator is
    /// configured; otherwise propagates pack and obfuscation errors.
    pub fn pack_key(&self, values: &BTreeMap<String, BigUint>) -> Result<String> {
        let obfuscator = self
            .obfuscator
            .as_ref()
            .ok_or(PackerError::ObfuscatorRequired)?;
        let packed = self.pack(values)?;
        obfuscator.key(&packed)
    }

    /// Unpack an integer into its field values.
    ///
    /// # Errors
    /// Returns [`PackerError::PackedValueTooLarge`] when the integer is
    /// wider than the schema.
    pub fn unpack(&self, packed: &BigUint) -> Result<BTreeMap<String, BigUint>> {
        if packed > self.schema.maximum_value() {
            return Err(PackerError::PackedValueTooLarge {
                value: packed.clone(),
                max: self.schema.maximum_value().clone(),
            }
            .into());
        }
        let mut values = BTreeMap::new();
        for (field, shift) in self.schema.layout() {
            let mask = (BigUint::one() << u64::from(field.bits)) - 1u32;
            values.insert(field.name.clone(), (packed >> shift) & mask);
        }
        Ok(values)
    }

    /// Unpack an obfuscated key into its field values.
    ///
    /// # Errors
    /// Returns [`PackerError::ObfuscatorRequired`] when no obfuscator is
    /// configured; otherwise propagates deobfuscation and unpack errors.
    pub fn unpack_key(&self, key: &str) -> Result<BTreeMap<String, BigUint>> {
        let obfuscator = self
            .obfuscator
            .as_ref()
            .ok_or(PackerError::ObfuscatorRequired)?;
        let packed = obfuscator.value(key)?;
        self.unpack(&packed)
    }

    /// Pack a value map into `ceil(total_bits / 8)` bytes.
    ///
    /// # Errors
    /// Propagates pack errors.
    pub fn pack_bytes(
        &self,
        values: &BTreeMap<String, BigUint>,
        order: ByteOrder,
    ) -> Result<Vec<u8>> {
        let packed = self.pack(values)?;
        let width = self.schema.byte_width();
        let mut bytes = vec![0u8; width];
        if !packed.is_zero() {
            match order {
                ByteOrder::Big => {
                    let raw = packed.to_bytes_be();
                    bytes[width - raw.len()..].copy_from_slice(&raw);
                }
                ByteOrder::Little => {
                    let raw = packed.to_bytes_le();
                    bytes[..raw.len()].copy_from_slice(&raw);
                }
            }
        }
        Ok(bytes)
    }

    /// Unpack a fixed-width byte sequence into its field values.
    ///
    /// # Errors
    /// - [`PackerError::ByteLengthMismatch`] unless the input is exactly
    ///   `ceil(total_bits / 8)` bytes
    /// - [`PackerError::PackedValueTooLarge`] when padding bits are set
    pub fn unpack_bytes(
        &self,
        bytes: &[u8],
        order: ByteOrder,
    ) -> Result<BTreeMap<String, BigUint>> {
        let expected = self.schema.byte_width();
        if bytes.len() != expected {
            return Err(PackerError::ByteLengthMismatch {
                expected,
                actual: bytes.len(),
            }
            .into());
        }
        let packed = match order {
            ByteOrder::Big => BigUint::from_bytes_be(bytes),
            ByteOrder::Little => BigUint::from_bytes_le(bytes),
        };
        self.unpack(&packed)
    }
}
