//! Named bit-field layouts for packing structured values.
//!
//! A [`Schema`] maps field names to bit widths and derives each field's
//! shift offset within the packed integer. The last-listed field occupies
//! the least-significant bits, so a schema reads like the packed value
//! does, most-significant field first:
//!
//! ```text
//! [ id: 10 bits ][ type: 2 bits ][ flag: 1 bit ]
//!   shift 3        shift 1         shift 0
//! ```
//!
//! Validation is eager: a schema that constructs successfully is valid for
//! its whole lifetime.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Result, SchemaError};

/// A single named bit field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name; must be identifier-like and unique within a schema.
    pub name: String,

    /// Width in bits; must be positive.
    pub bits: u32,
}

impl Field {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, bits: u32) -> Self {
        Self {
            name: name.into(),
            bits,
        }
    }
}

/// An immutable, validated field layout.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
    shifts: Vec<u64>,
    total_bits: u64,
    maximum_value: BigUint,
}

impl Schema {
    /// Validate a field list and derive the layout.
    ///
    /// # Errors
    /// A [`SchemaError`] naming the offending field index when a name is
    /// empty or not identifier-like, a bit width is zero, or a name
    /// repeats.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName { index }.into());
            }
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidFieldName {
                    index,
                    name: field.name.clone(),
                }
                .into());
            }
            if field.bits == 0 {
                return Err(SchemaError::ZeroBitWidth {
                    index,
                    name: field.name.clone(),
                }
                .into());
            }
            if !seen.insert(&field.name) {
                return Err(SchemaError::DuplicateFieldName {
                    index,
                    name: field.name.clone(),
                }
                .into());
            }
        }

        // Shifts accumulate from the last field upward: the last field
        // sits at bit 0.
        let mut shifts = vec![0u64; fields.len()];
        let mut shift = 0u64;
        for index in (0..fields.len()).rev() {
            shifts[index] = shift;
            shift += u64::from(fields[index].bits);
        }
        let total_bits = shift;
        let maximum_value = (BigUint::one() << total_bits) - 1u32;

        Ok(Self {
            fields,
            shifts,
            total_bits,
            maximum_value,
        })
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Sum of all field widths.
    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }

    /// Largest packable integer: `2^total_bits - 1`.
    pub fn maximum_value(&self) -> &BigUint {
        &self.maximum_value
    }

    /// Bytes needed to hold a packed value: `ceil(total_bits / 8)`.
    pub fn byte_width(&self) -> usize {
        ((self.total_bits + 7) / 8) as usize
    }

    /// Shift offset of a field, if it exists.
    pub fn shift_of(&self, name: &str) -> Option<u64> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .map(|index| self.shifts[index])
    }

    /// Fields paired with their shift offsets, in declaration order.
    pub(crate) fn layout(&self) -> impl Iterator<Item = (&Field, u64)> + '_ {
        self.fields.iter().zip(self.shifts.iter().copied())
    }

    /// Check a value map against this schema.
    ///
    /// The map's key set must exactly equal the schema's field names, and
    /// every value must fit its field's bit width.
    ///
    /// # Errors
    /// - [`SchemaError::FieldSetMismatch`] listing sorted missing and
    ///   sorted extra names
    /// - [`SchemaError::ValueOverflow`] naming the field, value, width,
    ///   and maximum
    pub fn validate_values(&self, values: &BTreeMap<String, BigUint>) -> Result<()> {
        let schema_names: BTreeSet<&str> =
            self.fields.iter().map(|field| field.name.as_str()).collect();
        let value_names: BTreeSet<&str> = values.keys().map(String::as_str).collect();
        if schema_names != value_names {
            let missing = schema_names
                .difference(&value_names)
                .map(|name| name.to_string())
                .collect();
            let extra = value_names
                .difference(&schema_names)
                .map(|name| name.to_string())
                .collect();
            return Err(SchemaError::FieldSetMismatch { missing, extra }.into());
        }

        for field in &self.fields {
            let value = &values[&field.name];
            let max = (BigUint::one() << u64::from(field.bits)) - 1u32;
            if value > &max {
                return Err(SchemaError::ValueOverflow {
                    field: field.name.clone(),
                    value: value.clone(),
                    bits: field.bits,
                    max,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Identifier-like: ASCII letter or underscore, then letters, digits,
/// underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
