//! Object codec: versioned canonical JSON.
//!
//! Serialized-object columns hold arbitrary structured values that the
//! storage layer treats as opaque bytes. Equality filters compare the
//! stored bytes directly, so the encoding must be deterministic: two equal
//! values must always produce identical bytes. `serde_json` keeps object
//! keys in a sorted map, so rendering is canonical without extra work.
//!
//! The encoding carries an explicit `v1:` version prefix so the format can
//! be revised without misreading old rows as the new format.

use crate::error::ColumnError;
use crate::schema::{ColumnType, ColumnValue};

use super::ColumnCodec;

/// Version prefix for the current object encoding
pub const OBJECT_ENCODING_PREFIX: &[u8] = b"v1:";

/// Canonical-JSON codec for serialized-object columns
#[derive(Debug)]
pub struct ObjectCodec {
    column: String,
}

impl ObjectCodec {
    pub(crate) fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ColumnCodec for ObjectCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Object
    }

    fn validate(&self, value: &ColumnValue) -> Result<(), ColumnError> {
        match value {
            ColumnValue::Object(_) => Ok(()),
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "object",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn encode(&self, value: ColumnValue) -> Result<Vec<u8>, ColumnError> {
        match value {
            ColumnValue::Object(v) => {
                let json =
                    serde_json::to_vec(&v).map_err(|e| ColumnError::UnsupportedValueKind {
                        column: self.column.clone(),
                        expected: "JSON-serializable object",
                        actual: e.to_string(),
                    })?;
                let mut out = Vec::with_capacity(OBJECT_ENCODING_PREFIX.len() + json.len());
                out.extend_from_slice(OBJECT_ENCODING_PREFIX);
                out.extend_from_slice(&json);
                Ok(out)
            }
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "object",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ColumnError> {
        let payload = bytes
            .strip_prefix(OBJECT_ENCODING_PREFIX)
            .ok_or_else(|| ColumnError::CorruptEncoding {
                column: self.column.clone(),
                detail: "missing object encoding version prefix".to_string(),
            })?;
        let value: serde_json::Value =
            serde_json::from_slice(payload).map_err(|e| ColumnError::CorruptEncoding {
                column: self.column.clone(),
                detail: format!("object payload is not valid JSON: {}", e),
            })?;
        Ok(ColumnValue::Object(value))
    }
}
