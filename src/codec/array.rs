//! Array codec: boundary-marked token serialization.
//!
//! Serialized-array columns hold a flat ordered sequence of scalars. The
//! encoding is designed so that membership of a single element can be
//! tested with a substring match against the stored bytes, without
//! deserializing the whole sequence: each element is rendered as a JSON
//! token, wrapped in `| token |` boundary markers, and the wrapped tokens
//! are space-joined:
//!
//! ```text
//! ["novel", "russian"]  ->  | "novel" | | "russian" |
//! ```
//!
//! Tokens never contain the `|` character: it can only occur inside string
//! scalars, where it is rewritten to the JSON escape `\u007c` (standard
//! JSON parsing restores it on decode). A `| token |` needle therefore
//! cannot match across element boundaries: `"at"` does not match inside
//! `"cat"`, and a crafted string element cannot forge the boundaries of a
//! numeric or boolean token.
//!
//! Nested containers and associative structures violate the encoding
//! contract and are rejected with `InvalidArrayShape` at encode time, never
//! silently flattened.

use crate::error::ColumnError;
use crate::schema::{ColumnType, ColumnValue};

use super::ColumnCodec;

/// Render one scalar element as its pipe-free JSON token.
///
/// Rejects nested arrays and associative structures.
pub(crate) fn element_token(
    column: &str,
    element: &serde_json::Value,
) -> Result<String, ColumnError> {
    match element {
        serde_json::Value::Array(_) => Err(ColumnError::InvalidArrayShape {
            column: column.to_string(),
            detail: "nested array element".to_string(),
        }),
        serde_json::Value::Object(_) => Err(ColumnError::InvalidArrayShape {
            column: column.to_string(),
            detail: "associative (key-value) element".to_string(),
        }),
        scalar => {
            let json =
                serde_json::to_string(scalar).map_err(|e| ColumnError::UnsupportedValueKind {
                    column: column.to_string(),
                    expected: "JSON scalar element",
                    actual: e.to_string(),
                })?;
            Ok(json.replace('|', "\\u007c"))
        }
    }
}

/// Wrap a token in its boundary markers, as stored and as searched for
pub(crate) fn marked(token: &str) -> String {
    format!("| {} |", token)
}

/// Boundary-marked token codec for serialized-array columns
#[derive(Debug)]
pub struct ArrayCodec {
    column: String,
}

impl ArrayCodec {
    pub(crate) fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ColumnCodec for ArrayCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Array
    }

    fn validate(&self, value: &ColumnValue) -> Result<(), ColumnError> {
        match value {
            ColumnValue::Array(elements) => {
                for element in elements {
                    element_token(&self.column, element)?;
                }
                Ok(())
            }
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "flat scalar array",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn encode(&self, value: ColumnValue) -> Result<Vec<u8>, ColumnError> {
        match value {
            ColumnValue::Array(elements) => {
                let mut tokens = Vec::with_capacity(elements.len());
                for element in &elements {
                    tokens.push(marked(&element_token(&self.column, element)?));
                }
                Ok(tokens.join(" ").into_bytes())
            }
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "flat scalar array",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ColumnError> {
        if bytes.is_empty() {
            return Ok(ColumnValue::Array(Vec::new()));
        }
        let text = std::str::from_utf8(bytes).map_err(|_| ColumnError::CorruptEncoding {
            column: self.column.clone(),
            detail: "array encoding is not valid UTF-8".to_string(),
        })?;
        let body = text
            .strip_prefix("| ")
            .and_then(|s| s.strip_suffix(" |"))
            .ok_or_else(|| ColumnError::CorruptEncoding {
                column: self.column.clone(),
                detail: "array encoding is missing boundary markers".to_string(),
            })?;
        let mut elements = Vec::new();
        for token in body.split(" | | ") {
            let value: serde_json::Value =
                serde_json::from_str(token).map_err(|e| ColumnError::CorruptEncoding {
                    column: self.column.clone(),
                    detail: format!("array token {:?} is not a JSON scalar: {}", token, e),
                })?;
            if value.is_array() || value.is_object() {
                return Err(ColumnError::CorruptEncoding {
                    column: self.column.clone(),
                    detail: format!("array token {:?} is not a scalar", token),
                });
            }
            elements.push(value);
        }
        Ok(ColumnValue::Array(elements))
    }
}
