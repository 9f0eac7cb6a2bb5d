//! Enum codec: member string to ordinal integer and back.
//!
//! A member is stored as its 0-based position in the column's `EnumSpec`,
//! serialized as ASCII decimal. Encoding a non-member fails with
//! `InvalidEnumValue` before anything reaches storage, so membership is the
//! encoding contract, not a best-effort check.

use crate::error::ColumnError;
use crate::schema::{ColumnDecl, ColumnType, ColumnValue, EnumSpec};

use super::ColumnCodec;

/// Ordinal codec bound to one column's `EnumSpec`
#[derive(Debug)]
pub struct EnumCodec {
    column: String,
    spec: EnumSpec,
}

impl EnumCodec {
    /// Build from a declaration; the declaration must carry an `EnumSpec`.
    pub(crate) fn new(decl: &ColumnDecl) -> Result<Self, ColumnError> {
        let spec = decl.enum_spec.clone().ok_or_else(|| {
            ColumnError::InvalidSchema(format!(
                "enum column {} declared without an enum spec",
                decl.name
            ))
        })?;
        Ok(Self {
            column: decl.name.clone(),
            spec,
        })
    }

    fn ordinal_of(&self, value: &str) -> Result<usize, ColumnError> {
        self.spec
            .ordinal(value)
            .ok_or_else(|| ColumnError::InvalidEnumValue {
                column: self.column.clone(),
                value: value.to_string(),
                members: self.spec.members().to_vec(),
            })
    }
}

impl ColumnCodec for EnumCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Enum
    }

    fn validate(&self, value: &ColumnValue) -> Result<(), ColumnError> {
        match value {
            ColumnValue::Enum(v) => self.ordinal_of(v).map(|_| ()),
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "enum member",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn encode(&self, value: ColumnValue) -> Result<Vec<u8>, ColumnError> {
        match value {
            ColumnValue::Enum(v) => {
                let ordinal = self.ordinal_of(&v)?;
                Ok(ordinal.to_string().into_bytes())
            }
            other => Err(ColumnError::UnsupportedValueKind {
                column: self.column.clone(),
                expected: "enum member",
                actual: other.kind().to_string(),
            }),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ColumnError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ColumnError::CorruptEncoding {
            column: self.column.clone(),
            detail: "enum ordinal is not valid UTF-8".to_string(),
        })?;
        let ordinal: usize = text.parse().map_err(|_| ColumnError::CorruptEncoding {
            column: self.column.clone(),
            detail: format!("enum ordinal {:?} is not an integer", text),
        })?;
        let member = self
            .spec
            .member(ordinal)
            .ok_or_else(|| ColumnError::CorruptEncoding {
                column: self.column.clone(),
                detail: format!(
                    "enum ordinal {} out of range for {} member(s)",
                    ordinal,
                    self.spec.len()
                ),
            })?;
        Ok(ColumnValue::Enum(member.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> EnumCodec {
        let spec = EnumSpec::new(["novel", "essay", "poetry"]).unwrap();
        EnumCodec::new(&ColumnDecl::enumeration("style", spec)).unwrap()
    }

    #[test]
    fn test_enum_encode_is_ordinal() {
        let codec = codec();
        assert_eq!(
            codec.encode(ColumnValue::Enum("novel".to_string())).unwrap(),
            b"0"
        );
        assert_eq!(
            codec.encode(ColumnValue::Enum("poetry".to_string())).unwrap(),
            b"2"
        );
    }

    #[test]
    fn test_enum_round_trip_stability() {
        let codec = codec();
        let encoded = codec.encode(ColumnValue::Enum("essay".to_string())).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        let re_encoded = codec.encode(decoded).unwrap();
        assert_eq!(re_encoded, encoded);
    }

    #[test]
    fn test_enum_rejects_non_member() {
        let codec = codec();
        let err = codec
            .encode(ColumnValue::Enum("thriller".to_string()))
            .unwrap_err();
        match err {
            ColumnError::InvalidEnumValue { value, members, .. } => {
                assert_eq!(value, "thriller");
                assert_eq!(members.len(), 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_enum_decode_out_of_range_is_corrupt() {
        let codec = codec();
        let err = codec.decode(b"7").unwrap_err();
        assert!(matches!(err, ColumnError::CorruptEncoding { .. }));
    }

    #[test]
    fn test_enum_decode_garbage_is_corrupt() {
        let codec = codec();
        assert!(matches!(
            codec.decode(b"novel").unwrap_err(),
            ColumnError::CorruptEncoding { .. }
        ));
        assert!(matches!(
            codec.decode(&[0xff, 0xfe]).unwrap_err(),
            ColumnError::CorruptEncoding { .. }
        ));
    }

    #[test]
    fn test_enum_codec_requires_spec() {
        let err = EnumCodec::new(&ColumnDecl {
            name: "style".to_string(),
            column_type: ColumnType::Enum,
            enum_spec: None,
            nullable: false,
        })
        .unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }
}
