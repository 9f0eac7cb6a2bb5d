//! Codec registry and the four built-in column codecs.
//!
//! A codec pairs an encode function (in-memory value to stored bytes) and a
//! decode function (stored bytes to in-memory value) for one logical column
//! type. The registry maps type tags to codec factories; binding a factory
//! to a column declaration produces the per-column codec instance (the enum
//! codec, for example, captures the column's `EnumSpec`).
//!
//! # Encodings
//!
//! - **Blob**: identity; decode always yields a stream-shaped handle
//! - **Enum**: 0-based ordinal in the `EnumSpec`, as ASCII decimal
//! - **Object**: `v1:` version prefix + canonical JSON
//! - **Array**: boundary-marked JSON tokens, substring-searchable
//!
//! All four encodings are byte-deterministic: equal values always encode to
//! identical bytes, which the predicate translator's equality fragments
//! rely on.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::ColumnError;
use crate::schema::{ColumnDecl, ColumnType, ColumnValue};

pub mod array;
pub mod blob;
pub mod enums;
pub mod object;

#[doc(inline)]
pub use array::ArrayCodec;
#[doc(inline)]
pub use blob::{BlobCodec, BlobValue};
#[doc(inline)]
pub use enums::EnumCodec;
#[doc(inline)]
pub use object::{ObjectCodec, OBJECT_ENCODING_PREFIX};

/// Paired encode/decode functions for one column's logical type.
///
/// Implementations are bound to a specific column (they carry the column
/// name for error context, and whatever type metadata they need). `encode`
/// consumes the value because blob encoding drains a single-pass stream;
/// cheap values are cloned by callers that need to keep them.
pub trait ColumnCodec: Send + Sync + std::fmt::Debug {
    /// The type tag this codec serves
    fn column_type(&self) -> ColumnType;

    /// Check a value's shape and membership without encoding it.
    ///
    /// Mutators call this to fail fast before touching stored state.
    fn validate(&self, value: &ColumnValue) -> Result<(), ColumnError>;

    /// Encode an in-memory value to its stored byte form
    fn encode(&self, value: ColumnValue) -> Result<Vec<u8>, ColumnError>;

    /// Decode stored bytes back to the in-memory representation
    fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ColumnError>;
}

/// Factory producing a per-column codec from its declaration
pub type CodecFactory = fn(&ColumnDecl) -> Result<Box<dyn ColumnCodec>, ColumnError>;

/// Registry mapping logical column type tags to codec factories.
///
/// Read-mostly after initialization: build it once (usually via
/// [`CodecRegistry::builtins`]), then bind declarations against it.
///
/// # Example
///
/// ```
/// use buoy::codec::CodecRegistry;
/// use buoy::ColumnDecl;
///
/// let registry = CodecRegistry::builtins();
/// let codec = registry.bind(&ColumnDecl::array("tags")).unwrap();
/// assert_eq!(codec.column_type(), buoy::ColumnType::Array);
/// ```
pub struct CodecRegistry {
    factories: HashMap<ColumnType, CodecFactory>,
}

impl CodecRegistry {
    /// Registry with no codecs registered
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the four built-in codecs
    #[must_use]
    pub fn builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(ColumnType::Blob, |decl| {
            Ok(Box::new(BlobCodec::new(decl.name.clone())))
        });
        registry.register(ColumnType::Enum, |decl| {
            Ok(Box::new(EnumCodec::new(decl)?))
        });
        registry.register(ColumnType::Object, |decl| {
            Ok(Box::new(ObjectCodec::new(decl.name.clone())))
        });
        registry.register(ColumnType::Array, |decl| {
            Ok(Box::new(ArrayCodec::new(decl.name.clone())))
        });
        registry
    }

    /// Register a factory for a type tag, replacing any existing one
    pub fn register(&mut self, tag: ColumnType, factory: CodecFactory) {
        self.factories.insert(tag, factory);
    }

    /// Instantiate the codec for a column declaration.
    ///
    /// Fails with `InvalidSchema` if no factory is registered for the
    /// declaration's type tag, or if the declaration is malformed for it
    /// (e.g. an enum column without an `EnumSpec`).
    pub fn bind(&self, decl: &ColumnDecl) -> Result<Box<dyn ColumnCodec>, ColumnError> {
        let factory = self.factories.get(&decl.column_type).ok_or_else(|| {
            ColumnError::InvalidSchema(format!(
                "no codec registered for column type {}",
                decl.column_type
            ))
        })?;
        factory(decl)
    }
}

static BUILTINS: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::builtins);

/// Process-wide registry holding the built-in codecs
#[must_use]
pub fn builtin_registry() -> &'static CodecRegistry {
    &BUILTINS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EnumSpec;

    #[test]
    fn test_builtins_cover_all_type_tags() {
        let registry = CodecRegistry::builtins();
        let spec = EnumSpec::new(["a", "b"]).unwrap();
        for decl in [
            ColumnDecl::blob("b"),
            ColumnDecl::enumeration("e", spec),
            ColumnDecl::object("o"),
            ColumnDecl::array("a"),
        ] {
            let codec = registry.bind(&decl).unwrap();
            assert_eq!(codec.column_type(), decl.column_type);
        }
    }

    #[test]
    fn test_empty_registry_binds_nothing() {
        let err = CodecRegistry::empty()
            .bind(&ColumnDecl::object("o"))
            .unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }

    #[test]
    fn test_register_replaces_factory() {
        let mut registry = CodecRegistry::builtins();
        registry.register(ColumnType::Object, |decl| {
            // stand-in factory: array codec under the object tag
            Ok(Box::new(ArrayCodec::new(decl.name.clone())))
        });
        let codec = registry.bind(&ColumnDecl::object("o")).unwrap();
        assert_eq!(codec.column_type(), ColumnType::Array);
    }
}
