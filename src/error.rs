//! Error types for column codec and filter operations.
//!
//! This module provides the `ColumnError` enum covering every failure the
//! codec, record, and predicate layers can surface. All errors are raised
//! synchronously at the point of violation; nothing is retried internally
//! and nothing is swallowed. A null cell loaded from storage is not an
//! error; it decodes to an absent field value.

use crate::schema::ColumnType;

/// Error type for column codec, record, and filter operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    /// Assignment or filter value outside the column's `EnumSpec`
    InvalidEnumValue {
        column: String,
        value: String,
        members: Vec<String>,
    },
    /// Nested or associative input to an array column
    InvalidArrayShape { column: String, detail: String },
    /// Encode or mutate called with a value the codec cannot represent
    UnsupportedValueKind {
        column: String,
        expected: &'static str,
        actual: String,
    },
    /// Stored bytes violate the codec's format invariant
    CorruptEncoding { column: String, detail: String },
    /// Filter attempted against a column type that forbids it (e.g. blob)
    UnsupportedFilterTarget {
        column: String,
        column_type: ColumnType,
    },
    /// Column not found in the schema
    ColumnNotFound(String),
    /// Invalid schema declaration (duplicate columns, bad enum spec, etc.)
    InvalidSchema(String),
}

impl std::fmt::Display for ColumnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnError::InvalidEnumValue {
                column,
                value,
                members,
            } => write!(
                f,
                "Invalid enum value for column {}: {:?} is not one of [{}]",
                column,
                value,
                members.join(", ")
            ),
            ColumnError::InvalidArrayShape { column, detail } => {
                write!(f, "Invalid array shape for column {}: {}", column, detail)
            }
            ColumnError::UnsupportedValueKind {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Unsupported value kind for column {}: expected {}, got {}",
                column, expected, actual
            ),
            ColumnError::CorruptEncoding { column, detail } => {
                write!(f, "Corrupt encoding for column {}: {}", column, detail)
            }
            ColumnError::UnsupportedFilterTarget {
                column,
                column_type,
            } => write!(
                f,
                "Filtering is not supported for column {} (type {})",
                column, column_type
            ),
            ColumnError::ColumnNotFound(column) => {
                write!(f, "Column not found: {}", column)
            }
            ColumnError::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
        }
    }
}

impl std::error::Error for ColumnError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_enum_value() {
        let err = ColumnError::InvalidEnumValue {
            column: "style".to_string(),
            value: "thriller".to_string(),
            members: vec!["novel".to_string(), "essay".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("style"));
        assert!(msg.contains("thriller"));
        assert!(msg.contains("novel, essay"));
    }

    #[test]
    fn test_display_unsupported_filter_target() {
        let err = ColumnError::UnsupportedFilterTarget {
            column: "cover_image".to_string(),
            column_type: ColumnType::Blob,
        };
        assert_eq!(
            err.to_string(),
            "Filtering is not supported for column cover_image (type blob)"
        );
    }

    #[test]
    fn test_display_column_not_found() {
        let err = ColumnError::ColumnNotFound("missing".to_string());
        assert_eq!(err.to_string(), "Column not found: missing");
    }
}
