//! Schema: ordered column declarations bound to their codecs.
//!
//! A `Schema` is built once from the declaration list supplied by the
//! schema/code-generation layer and is read-only afterwards. Binding
//! validates the declaration set as a whole (duplicate names, enum spec
//! placement) and instantiates one codec per column.

use std::collections::HashMap;

use crate::codec::{builtin_registry, CodecRegistry, ColumnCodec};
use crate::error::ColumnError;

use super::column::{ColumnDecl, ColumnType};

/// One column's declaration paired with its bound codec
pub struct BoundColumn {
    decl: ColumnDecl,
    codec: Box<dyn ColumnCodec>,
}

impl BoundColumn {
    /// Column name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// Logical type tag
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.decl.column_type
    }

    /// The full declaration
    #[must_use]
    pub fn decl(&self) -> &ColumnDecl {
        &self.decl
    }

    /// The codec bound to this column
    #[must_use]
    pub fn codec(&self) -> &dyn ColumnCodec {
        self.codec.as_ref()
    }
}

impl std::fmt::Debug for BoundColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundColumn")
            .field("decl", &self.decl)
            .finish_non_exhaustive()
    }
}

/// Validated, ordered set of columns with their codecs.
///
/// # Example
///
/// ```
/// use buoy::{ColumnDecl, EnumSpec, Schema};
///
/// let schema = Schema::new(vec![
///     ColumnDecl::enumeration("style", EnumSpec::new(["novel", "essay"]).unwrap()),
///     ColumnDecl::array("tags"),
///     ColumnDecl::blob("cover_image").nullable(),
/// ]).unwrap();
///
/// assert_eq!(schema.len(), 3);
/// assert_eq!(schema.column("tags").unwrap().column_type(), buoy::ColumnType::Array);
/// ```
pub struct Schema {
    columns: Vec<BoundColumn>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema using the built-in codec registry
    pub fn new(decls: Vec<ColumnDecl>) -> Result<Self, ColumnError> {
        Self::with_registry(decls, builtin_registry())
    }

    /// Build a schema against an explicit codec registry.
    ///
    /// Fails with `InvalidSchema` on duplicate column names, an `EnumSpec`
    /// attached to a non-enum column, or a declaration its codec factory
    /// rejects.
    pub fn with_registry(
        decls: Vec<ColumnDecl>,
        registry: &CodecRegistry,
    ) -> Result<Self, ColumnError> {
        let mut columns = Vec::with_capacity(decls.len());
        let mut by_name = HashMap::with_capacity(decls.len());
        for decl in decls {
            if decl.name.is_empty() {
                return Err(ColumnError::InvalidSchema(
                    "column name is empty".to_string(),
                ));
            }
            if decl.enum_spec.is_some() && decl.column_type != ColumnType::Enum {
                return Err(ColumnError::InvalidSchema(format!(
                    "column {} has an enum spec but type {}",
                    decl.name, decl.column_type
                )));
            }
            if by_name.contains_key(&decl.name) {
                return Err(ColumnError::InvalidSchema(format!(
                    "duplicate column name {}",
                    decl.name
                )));
            }
            let codec = registry.bind(&decl)?;
            by_name.insert(decl.name.clone(), columns.len());
            columns.push(BoundColumn { decl, codec });
        }
        Ok(Self { columns, by_name })
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&BoundColumn, ColumnError> {
        self.get(name)
            .ok_or_else(|| ColumnError::ColumnNotFound(name.to_string()))
    }

    /// Look up a column by name, `None` if absent
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoundColumn> {
        self.by_name.get(name).map(|&i| &self.columns[i])
    }

    /// Position of a column in declaration order
    #[must_use]
    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Columns in declaration order
    #[must_use]
    pub fn columns(&self) -> &[BoundColumn] {
        &self.columns
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema declares no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("columns", &self.columns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EnumSpec;

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema = Schema::new(vec![
            ColumnDecl::array("tags"),
            ColumnDecl::object("details"),
            ColumnDecl::blob("cover_image"),
        ])
        .unwrap();
        let names: Vec<&str> = schema.columns().iter().map(BoundColumn::name).collect();
        assert_eq!(names, ["tags", "details", "cover_image"]);
    }

    #[test]
    fn test_schema_rejects_duplicate_names() {
        let err = Schema::new(vec![
            ColumnDecl::array("tags"),
            ColumnDecl::object("tags"),
        ])
        .unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_rejects_spec_on_non_enum() {
        let mut decl = ColumnDecl::object("details");
        decl.enum_spec = Some(EnumSpec::new(["a"]).unwrap());
        let err = Schema::new(vec![decl]).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_rejects_enum_without_spec() {
        let decl = ColumnDecl {
            name: "style".to_string(),
            column_type: ColumnType::Enum,
            enum_spec: None,
            nullable: false,
        };
        let err = Schema::new(vec![decl]).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_unknown_column_lookup() {
        let schema = Schema::new(vec![ColumnDecl::array("tags")]).unwrap();
        let err = schema.column("missing").unwrap_err();
        assert_eq!(err, ColumnError::ColumnNotFound("missing".to_string()));
    }
}
