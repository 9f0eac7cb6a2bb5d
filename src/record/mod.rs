//! Typed record with per-field change tracking.
//!
//! A `Record` holds one row's advanced column values in decoded form,
//! tracks which fields have unsaved mutations, and mediates the storage
//! boundary: `load_row` decodes stored bytes in, `encode_dirty` encodes
//! the changed subset back out.
//!
//! # Mutator contract
//!
//! Every mutator validates against the column's codec first and fails fast
//! on violation, leaving the stored state untouched. Non-blob mutators
//! compare the incoming value with the current one and skip the dirty flag
//! on an equal write; blob mutators set the flag unconditionally, because a
//! stream's content can change out-of-band and handle identity implies
//! nothing about content equality.
//!
//! # Accessor contract
//!
//! `get` returns the decoded in-memory value, `None` for a stored null or
//! a never-loaded field, and performs no validation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use buoy::{ColumnDecl, ColumnValue, EnumSpec, Record, Schema};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     ColumnDecl::enumeration("style", EnumSpec::new(["novel", "essay"]).unwrap()),
//!     ColumnDecl::array("tags"),
//! ]).unwrap());
//!
//! let mut record = Record::new(schema);
//! record.set("style", ColumnValue::enumeration("novel")).unwrap();
//! record.add("tags", "russian".into()).unwrap();
//! assert_eq!(record.dirty_columns(), ["style", "tags"]);
//! ```

use std::sync::Arc;

use crate::codec::array::element_token;
use crate::error::ColumnError;
use crate::schema::{BoundColumn, ColumnType, ColumnValue, Schema};

pub mod field;
#[doc(inline)]
pub use field::FieldValue;

use field::Field;

/// One row's advanced column values with dirty tracking
pub struct Record {
    schema: Arc<Schema>,
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record; every field starts unset and clean
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        let fields = (0..schema.len()).map(|_| Field::default()).collect();
        Self { schema, fields }
    }

    /// The schema this record is bound to
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn slot(&self, column: &str) -> Result<usize, ColumnError> {
        self.schema
            .index_of(column)
            .ok_or_else(|| ColumnError::ColumnNotFound(column.to_string()))
    }

    fn bound(&self, index: usize) -> &BoundColumn {
        &self.schema.columns()[index]
    }

    /// Get the decoded value of a field.
    ///
    /// Returns `None` for a stored null or a never-loaded field. Never
    /// validates.
    pub fn get(&self, column: &str) -> Result<Option<&ColumnValue>, ColumnError> {
        let index = self.slot(column)?;
        Ok(self.fields[index].value.as_value())
    }

    /// Set a field's value.
    ///
    /// Validates shape and membership per the column's codec before
    /// touching stored state. Sets the dirty flag per the mutator
    /// contract (see module docs).
    pub fn set(&mut self, column: &str, value: ColumnValue) -> Result<(), ColumnError> {
        let index = self.slot(column)?;
        let bound = self.bound(index);
        bound.codec().validate(&value)?;

        let always_dirty = bound.column_type() == ColumnType::Blob;
        let field = &mut self.fields[index];
        let unchanged = matches!(&field.value, FieldValue::Set(current) if *current == value);
        field.value = FieldValue::Set(value);
        if always_dirty || !unchanged {
            field.dirty = true;
        }
        Ok(())
    }

    /// Set a nullable field to null.
    ///
    /// Fails with `UnsupportedValueKind` on a non-nullable column.
    pub fn set_null(&mut self, column: &str) -> Result<(), ColumnError> {
        let index = self.slot(column)?;
        let bound = self.bound(index);
        if !bound.decl().nullable {
            return Err(ColumnError::UnsupportedValueKind {
                column: column.to_string(),
                expected: bound.column_type().as_str(),
                actual: "null on a non-nullable column".to_string(),
            });
        }
        let field = &mut self.fields[index];
        let unchanged = field.value.is_absent();
        field.value = FieldValue::Absent;
        if !unchanged {
            field.dirty = true;
        }
        Ok(())
    }

    /// Move a field's value out, leaving it unset and clean.
    ///
    /// This is the only way to recover an owned blob handle from a record.
    pub fn take(&mut self, column: &str) -> Result<Option<ColumnValue>, ColumnError> {
        let index = self.slot(column)?;
        let field = &mut self.fields[index];
        field.dirty = false;
        Ok(std::mem::take(&mut field.value).into_value())
    }

    /// Check whether a field has an unsaved mutation
    pub fn is_dirty(&self, column: &str) -> Result<bool, ColumnError> {
        let index = self.slot(column)?;
        Ok(self.fields[index].dirty)
    }

    /// Names of dirty columns, in declaration order
    #[must_use]
    pub fn dirty_columns(&self) -> Vec<&str> {
        self.schema
            .columns()
            .iter()
            .zip(&self.fields)
            .filter(|(_, field)| field.dirty)
            .map(|(column, _)| column.name())
            .collect()
    }

    /// Membership test against an array field's current sequence.
    ///
    /// An unset or null field is treated as the empty sequence.
    pub fn has(&self, column: &str, element: &serde_json::Value) -> Result<bool, ColumnError> {
        let index = self.slot(column)?;
        let bound = self.bound(index);
        require_array(bound, column)?;
        match self.fields[index].value.as_value() {
            Some(ColumnValue::Array(elements)) => Ok(elements.contains(element)),
            _ => Ok(false),
        }
    }

    /// Append an element to an array field, materializing it if unset.
    ///
    /// Validates the element's shape (`InvalidArrayShape` for nested or
    /// associative input) and sets the dirty flag.
    pub fn add(&mut self, column: &str, element: serde_json::Value) -> Result<(), ColumnError> {
        let index = self.slot(column)?;
        let bound = self.bound(index);
        require_array(bound, column)?;
        element_token(column, &element)?;

        let field = &mut self.fields[index];
        match &mut field.value {
            FieldValue::Set(ColumnValue::Array(elements)) => elements.push(element),
            slot => *slot = FieldValue::Set(ColumnValue::Array(vec![element])),
        }
        field.dirty = true;
        Ok(())
    }

    /// Remove the first occurrence of an element from an array field.
    ///
    /// Returns `true` if an element was removed. An absent element is a
    /// no-op returning `false`, and the field stays clean.
    pub fn remove(
        &mut self,
        column: &str,
        element: &serde_json::Value,
    ) -> Result<bool, ColumnError> {
        let index = self.slot(column)?;
        let bound = self.bound(index);
        require_array(bound, column)?;

        let field = &mut self.fields[index];
        if let FieldValue::Set(ColumnValue::Array(elements)) = &mut field.value {
            if let Some(position) = elements.iter().position(|e| e == element) {
                elements.remove(position);
                field.dirty = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Load a row of encoded cells, decoding each through its codec.
    ///
    /// A `None` cell decodes to an absent (null) value. Loaded fields have
    /// their dirty flags reset; fields not mentioned keep their state.
    ///
    /// Not atomic across columns: on a decode error, cells processed
    /// before the failure keep their new values. Callers that need
    /// all-or-nothing semantics reload the record.
    pub fn load_row<I, S, B>(&mut self, cells: I) -> Result<(), ColumnError>
    where
        I: IntoIterator<Item = (S, Option<B>)>,
        S: AsRef<str>,
        B: AsRef<[u8]>,
    {
        for (name, bytes) in cells {
            let name = name.as_ref();
            let index = self.slot(name)?;
            let value = match bytes {
                Some(bytes) => FieldValue::Set(self.bound(index).codec().decode(bytes.as_ref())?),
                None => FieldValue::Absent,
            };
            let field = &mut self.fields[index];
            field.value = value;
            field.dirty = false;
        }
        Ok(())
    }

    /// Encode the dirty fields for persistence, in declaration order.
    ///
    /// Returns `(column, encoded-or-null)` pairs. Blob values are consumed
    /// by encoding (their field reverts to unset); other values stay in
    /// place. Dirty flags are left set; call [`Record::mark_saved`] after
    /// the storage layer confirms the write.
    pub fn encode_dirty(&mut self) -> Result<Vec<(String, Option<Vec<u8>>)>, ColumnError> {
        let mut out = Vec::new();
        for index in 0..self.fields.len() {
            if !self.fields[index].dirty {
                continue;
            }
            let name = self.bound(index).name().to_string();
            let cloned = match &self.fields[index].value {
                FieldValue::Unset => continue,
                FieldValue::Absent => {
                    out.push((name, None));
                    continue;
                }
                FieldValue::Set(value) => value.try_clone(),
            };
            let owned = match cloned {
                Some(clone) => clone,
                // single-pass stream: move it out for encoding
                None => std::mem::take(&mut self.fields[index].value)
                    .into_value()
                    .expect("field value checked Set"),
            };
            let encoded = self.bound(index).codec().encode(owned)?;
            out.push((name, Some(encoded)));
        }
        Ok(out)
    }

    /// Clear all dirty flags after a successful save
    pub fn mark_saved(&mut self) {
        for field in &mut self.fields {
            field.dirty = false;
        }
    }
}

fn require_array(bound: &BoundColumn, column: &str) -> Result<(), ColumnError> {
    if bound.column_type() == ColumnType::Array {
        Ok(())
    } else {
        Err(ColumnError::UnsupportedValueKind {
            column: column.to_string(),
            expected: "array",
            actual: format!("{} column", bound.column_type()),
        })
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("dirty", &self.dirty_columns())
            .finish_non_exhaustive()
    }
}
