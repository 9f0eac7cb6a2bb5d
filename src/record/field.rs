//! `FieldValue` wrapper for per-field value state.
//!
//! Wraps a field's decoded value with information about whether it is set,
//! stored-null, or never loaded.

use crate::schema::ColumnValue;

/// Per-field value state inside a [`Record`](crate::record::Record).
///
/// - `Set`: the field holds a decoded value
/// - `Absent`: storage holds NULL for this field (or null was assigned)
/// - `Unset`: the field was never loaded and never written
///
/// `Absent` and `Unset` both read back as "no value", but they differ on
/// the write path: an `Absent` field is a real null that `encode_dirty`
/// emits, while an `Unset` field is simply not part of the record's state.
#[derive(Debug, PartialEq, Default)]
pub enum FieldValue {
    /// Field has a decoded value
    Set(ColumnValue),
    /// Storage holds NULL for this field
    Absent,
    /// Field was never loaded and never written
    #[default]
    Unset,
}

impl FieldValue {
    /// Check if the field holds a value
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, FieldValue::Set(_))
    }

    /// Check if the field is a stored null
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Check if the field was never loaded or written
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    /// Borrow the value if set, `None` otherwise
    #[must_use]
    pub fn as_value(&self) -> Option<&ColumnValue> {
        match self {
            FieldValue::Set(v) => Some(v),
            FieldValue::Absent | FieldValue::Unset => None,
        }
    }

    /// Convert to `Option<ColumnValue>`, consuming the wrapper
    #[must_use]
    pub fn into_value(self) -> Option<ColumnValue> {
        match self {
            FieldValue::Set(v) => Some(v),
            FieldValue::Absent | FieldValue::Unset => None,
        }
    }
}

impl From<ColumnValue> for FieldValue {
    fn from(value: ColumnValue) -> Self {
        FieldValue::Set(value)
    }
}

/// One field slot: value state plus the dirty flag
#[derive(Debug, Default)]
pub(crate) struct Field {
    pub(crate) value: FieldValue,
    pub(crate) dirty: bool,
}
