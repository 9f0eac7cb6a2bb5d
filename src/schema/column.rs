//! Column declarations and in-memory column values.
//!
//! This module provides the per-column descriptor table consumed by
//! [`Schema`](crate::schema::Schema): `ColumnType` (the logical type tag),
//! `EnumSpec` (the ordered member set for enumeration columns), and
//! `ColumnDecl` (one column's metadata). It also defines `ColumnValue`, the
//! decoded in-memory representation that accessors and mutators trade in.
//!
//! Declarations derive `Serialize`/`Deserialize` so a schema or code
//! generation layer can hand them over as plain data.

use serde::{Deserialize, Serialize};

use crate::codec::BlobValue;
use crate::error::ColumnError;

/// Logical type tag for an advanced column.
///
/// Each tag identifies a codec in the registry. Primitive column types
/// (integers, text, timestamps) are handled by the storage driver directly
/// and never reach this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Large unstructured data, surfaced as a stream-shaped handle
    Blob,
    /// Validated discrete value from an `EnumSpec`
    Enum,
    /// Arbitrary structured value, serialized opaquely
    Object,
    /// Flat ordered sequence of scalar values
    Array,
}

impl ColumnType {
    /// Codec identifier for this type tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Blob => "blob",
            ColumnType::Enum => "enum",
            ColumnType::Object => "object",
            ColumnType::Array => "array",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of permitted values for an enumeration column.
///
/// Membership is validated on assignment and on filter input, before
/// anything reaches storage. The member order is significant: the enum
/// codec stores a member as its 0-based position in this set, so reordering
/// members in a deployed schema changes the meaning of stored data.
///
/// # Example
///
/// ```
/// use buoy::EnumSpec;
///
/// let spec = EnumSpec::new(["novel", "essay", "poetry"]).unwrap();
/// assert_eq!(spec.ordinal("essay"), Some(1));
/// assert_eq!(spec.member(2), Some("poetry"));
/// assert!(!spec.contains("thriller"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumSpec {
    members: Vec<String>,
}

impl EnumSpec {
    /// Create a spec from an ordered list of members.
    ///
    /// Fails with `InvalidSchema` on an empty list, an empty member name,
    /// or a duplicate member.
    pub fn new<I, S>(members: I) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(ColumnError::InvalidSchema(
                "enum spec must have at least one member".to_string(),
            ));
        }
        for (i, member) in members.iter().enumerate() {
            if member.is_empty() {
                return Err(ColumnError::InvalidSchema(format!(
                    "enum member at position {} is empty",
                    i
                )));
            }
            if members[..i].contains(member) {
                return Err(ColumnError::InvalidSchema(format!(
                    "duplicate enum member {:?}",
                    member
                )));
            }
        }
        Ok(Self { members })
    }

    /// The ordered member list
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// 0-based position of a member, or `None` if not a member
    #[must_use]
    pub fn ordinal(&self, value: &str) -> Option<usize> {
        self.members.iter().position(|m| m == value)
    }

    /// Member at a 0-based position, or `None` if out of range
    #[must_use]
    pub fn member(&self, ordinal: usize) -> Option<&str> {
        self.members.get(ordinal).map(String::as_str)
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.ordinal(value).is_some()
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for a constructed spec; kept for API completeness
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One column's declaration: name, type tag, and type-specific metadata.
///
/// An ordered list of declarations is the initialization input for a
/// [`Schema`](crate::schema::Schema). Enum columns must carry an
/// `enum_spec`; all other types must not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDecl {
    /// Column name as known to the storage layer
    pub name: String,
    /// Logical type tag selecting the codec
    pub column_type: ColumnType,
    /// Permitted values, for enum columns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_spec: Option<EnumSpec>,
    /// Whether storage may hold NULL for this column
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDecl {
    /// Declare a blob column
    #[must_use]
    pub fn blob(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Blob,
            enum_spec: None,
            nullable: false,
        }
    }

    /// Declare an enumeration column with its member set
    #[must_use]
    pub fn enumeration(name: impl Into<String>, spec: EnumSpec) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Enum,
            enum_spec: Some(spec),
            nullable: false,
        }
    }

    /// Declare a serialized-object column
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Object,
            enum_spec: None,
            nullable: false,
        }
    }

    /// Declare a serialized-array column
    #[must_use]
    pub fn array(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Array,
            enum_spec: None,
            nullable: false,
        }
    }

    /// Mark the column as nullable
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Decoded in-memory representation of a column value.
///
/// This is what accessors return and mutators accept. The variant must
/// match the column's declared type; codecs reject mismatches with
/// `UnsupportedValueKind` before any stored state is touched.
#[derive(Debug)]
pub enum ColumnValue {
    /// Stream-shaped large object handle
    Blob(BlobValue),
    /// Enumeration member (validated against the column's `EnumSpec`)
    Enum(String),
    /// Arbitrary structured value
    Object(serde_json::Value),
    /// Flat sequence of JSON scalars (no nested containers)
    Array(Vec<serde_json::Value>),
}

impl ColumnValue {
    /// Enumeration value from anything string-like
    #[must_use]
    pub fn enumeration(value: impl Into<String>) -> Self {
        ColumnValue::Enum(value.into())
    }

    /// Object value from any JSON structure
    #[must_use]
    pub fn object(value: serde_json::Value) -> Self {
        ColumnValue::Object(value)
    }

    /// Array value from a sequence of JSON scalars
    #[must_use]
    pub fn array(elements: Vec<serde_json::Value>) -> Self {
        ColumnValue::Array(elements)
    }

    /// Short kind name, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnValue::Blob(_) => "blob",
            ColumnValue::Enum(_) => "enum",
            ColumnValue::Object(_) => "object",
            ColumnValue::Array(_) => "array",
        }
    }

    /// The type tag this value belongs to
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValue::Blob(_) => ColumnType::Blob,
            ColumnValue::Enum(_) => ColumnType::Enum,
            ColumnValue::Object(_) => ColumnType::Object,
            ColumnValue::Array(_) => ColumnType::Array,
        }
    }

    /// Clone the value, except for blobs.
    ///
    /// Blob handles are single-owner streams and cannot be duplicated;
    /// returns `None` for them.
    #[must_use]
    pub fn try_clone(&self) -> Option<ColumnValue> {
        match self {
            ColumnValue::Blob(_) => None,
            ColumnValue::Enum(v) => Some(ColumnValue::Enum(v.clone())),
            ColumnValue::Object(v) => Some(ColumnValue::Object(v.clone())),
            ColumnValue::Array(v) => Some(ColumnValue::Array(v.clone())),
        }
    }
}

/// Value equality for change detection.
///
/// Blob values never compare equal, even to themselves: the underlying
/// stream can be mutated out-of-band, so handle identity implies nothing
/// about content equality.
impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ColumnValue::Enum(a), ColumnValue::Enum(b)) => a == b,
            (ColumnValue::Object(a), ColumnValue::Object(b)) => a == b,
            (ColumnValue::Array(a), ColumnValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl From<BlobValue> for ColumnValue {
    fn from(value: BlobValue) -> Self {
        ColumnValue::Blob(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_spec_ordinals() {
        let spec = EnumSpec::new(["novel", "essay", "poetry"]).unwrap();
        assert_eq!(spec.ordinal("novel"), Some(0));
        assert_eq!(spec.ordinal("poetry"), Some(2));
        assert_eq!(spec.ordinal("thriller"), None);
        assert_eq!(spec.member(1), Some("essay"));
        assert_eq!(spec.member(3), None);
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_enum_spec_rejects_duplicates() {
        let err = EnumSpec::new(["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }

    #[test]
    fn test_enum_spec_rejects_empty() {
        assert!(matches!(
            EnumSpec::new(Vec::<String>::new()).unwrap_err(),
            ColumnError::InvalidSchema(_)
        ));
        assert!(matches!(
            EnumSpec::new(["ok", ""]).unwrap_err(),
            ColumnError::InvalidSchema(_)
        ));
    }

    #[test]
    fn test_column_decl_builders() {
        let decl = ColumnDecl::array("tags").nullable();
        assert_eq!(decl.name, "tags");
        assert_eq!(decl.column_type, ColumnType::Array);
        assert!(decl.nullable);
        assert_eq!(decl.enum_spec, None);

        let spec = EnumSpec::new(["on", "off"]).unwrap();
        let decl = ColumnDecl::enumeration("state", spec.clone());
        assert_eq!(decl.enum_spec, Some(spec));
    }

    #[test]
    fn test_column_decl_serde_round_trip() {
        let spec = EnumSpec::new(["novel", "essay"]).unwrap();
        let decl = ColumnDecl::enumeration("style", spec).nullable();
        let json = serde_json::to_string(&decl).unwrap();
        let back: ColumnDecl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decl);
    }

    #[test]
    fn test_column_value_equality_ignores_blobs() {
        let a = ColumnValue::Blob(BlobValue::from_bytes(b"same".to_vec()));
        let b = ColumnValue::Blob(BlobValue::from_bytes(b"same".to_vec()));
        assert_ne!(a, b);

        let x = ColumnValue::Object(json!({"k": 1}));
        let y = ColumnValue::Object(json!({"k": 1}));
        assert_eq!(x, y);
    }
}
