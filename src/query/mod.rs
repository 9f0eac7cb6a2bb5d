//! Typed per-column filter surface.
//!
//! `Query` exposes one filter operation family per advanced column type,
//! each delegating to the predicate translator with the column's codec
//! context pre-bound. Inputs are validated before translation: an enum
//! value outside the column's `EnumSpec` fails fast with
//! `InvalidEnumValue` rather than emitting a fragment guaranteed to match
//! nothing.
//!
//! Accumulated filters combine as a conjunction. The result is either the
//! abstract [`Predicate`] tree (for execution layers with their own
//! rendering) or a `sea_query::Condition` via [`Query::to_condition`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use buoy::{ColumnDecl, ColumnValue, EnumSpec, Query, Schema};
//! use serde_json::json;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     ColumnDecl::enumeration("style", EnumSpec::new(["novel", "essay"]).unwrap()),
//!     ColumnDecl::array("tags"),
//! ]).unwrap());
//!
//! let predicate = Query::new(schema)
//!     .filter_eq("style", ColumnValue::enumeration("novel")).unwrap()
//!     .filter_contains_all("tags", &[json!("russian")]).unwrap()
//!     .build()
//!     .unwrap();
//! # let _ = predicate;
//! ```

use std::sync::Arc;

use crate::error::ColumnError;
use crate::predicate::translate::{self, ArrayMatchMode};
use crate::predicate::{render, Predicate};
use crate::schema::{ColumnValue, Schema};

/// Filter builder bound to a schema
pub struct Query {
    schema: Arc<Schema>,
    filters: Vec<Predicate>,
    advisory: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("schema", &self.schema)
            .field("filters", &self.filters)
            .field("advisory", &self.advisory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Query {
    /// Start an empty query against a schema
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            filters: Vec::new(),
            advisory: None,
        }
    }

    /// Install a runtime advisory callback for index-defeating filters.
    ///
    /// Without one, advisories go to `log::warn!`.
    #[must_use]
    pub fn with_scan_advisory<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.advisory = Some(Arc::new(callback));
        self
    }

    /// Filter on byte-exact equality of the stored encoding.
    ///
    /// Supported for enum columns (the value is validated against the
    /// `EnumSpec` first) and object columns. Blob and array columns fail
    /// with `UnsupportedFilterTarget`.
    pub fn filter_eq(mut self, column: &str, value: ColumnValue) -> Result<Self, ColumnError> {
        let bound = self.schema.column(column)?;
        let predicate = translate::equals(bound, value)?;
        self.filters.push(predicate);
        Ok(self)
    }

    /// Filter array columns on membership of a single element.
    ///
    /// Convenience for [`Query::filter_contains_all`] with one element.
    pub fn filter_contains(
        self,
        column: &str,
        element: serde_json::Value,
    ) -> Result<Self, ColumnError> {
        self.filter_membership(column, &[element], ArrayMatchMode::ContainsAll)
    }

    /// Filter array columns on presence of every listed element
    pub fn filter_contains_all(
        self,
        column: &str,
        elements: &[serde_json::Value],
    ) -> Result<Self, ColumnError> {
        self.filter_membership(column, elements, ArrayMatchMode::ContainsAll)
    }

    /// Filter array columns on presence of at least one listed element
    pub fn filter_contains_some(
        self,
        column: &str,
        elements: &[serde_json::Value],
    ) -> Result<Self, ColumnError> {
        self.filter_membership(column, elements, ArrayMatchMode::ContainsSome)
    }

    /// Filter array columns on absence of every listed element
    pub fn filter_contains_none(
        self,
        column: &str,
        elements: &[serde_json::Value],
    ) -> Result<Self, ColumnError> {
        self.filter_membership(column, elements, ArrayMatchMode::ContainsNone)
    }

    fn filter_membership(
        mut self,
        column: &str,
        elements: &[serde_json::Value],
        mode: ArrayMatchMode,
    ) -> Result<Self, ColumnError> {
        let bound = self.schema.column(column)?;
        let predicate =
            translate::array_membership(bound, elements, mode, self.advisory.as_deref())?;
        self.filters.push(predicate);
        Ok(self)
    }

    /// Add a pre-built predicate fragment as-is.
    ///
    /// This is the raw composition entry point: it accepts whatever
    /// [`Predicate::all`]/[`Predicate::any`]/[`Predicate::not`] produced,
    /// with no codec context and no validation.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    /// Conjunction of the accumulated filters.
    ///
    /// `None` when no filters were added; a single filter is returned
    /// unwrapped.
    #[must_use]
    pub fn build(mut self) -> Option<Predicate> {
        match self.filters.len() {
            0 => None,
            1 => self.filters.pop(),
            _ => Some(Predicate::And(self.filters)),
        }
    }

    /// Render the accumulated filters as a `sea_query::Condition`
    pub fn to_condition(&self) -> Result<Option<sea_query::Condition>, ColumnError> {
        if self.filters.is_empty() {
            return Ok(None);
        }
        let mut condition = sea_query::Condition::all();
        for filter in &self.filters {
            condition = condition.add(render::to_condition(filter)?);
        }
        Ok(Some(condition))
    }
}
