//! # Buoy
//!
//! Typed column-value codecs and filter predicates for advanced ORM column
//! types: blob (stream-shaped), enum (validated discrete value), serialized
//! object, and serialized array.
//!
//! Buoy sits between an application's typed model layer and a relational
//! storage backend. It owns three things:
//!
//! - **Encoding rules**: a codec per logical column type turns in-memory
//!   values into deterministic stored bytes and back
//! - **Change detection**: per-field dirty flags with a conservative
//!   always-dirty policy for stream-backed blob fields
//! - **Predicate translation**: typed filter requests become an abstract
//!   `{AND, OR, NOT, EQUALS, SUBSTRING_MATCH}` fragment tree, renderable
//!   into sea-query conditions
//!
//! Query execution, connection and transaction management, and schema
//! code generation are the surrounding layers' responsibility and are not
//! part of this crate.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use buoy::{ColumnDecl, ColumnValue, EnumSpec, Query, Record, Schema};
//! use serde_json::json;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     ColumnDecl::enumeration("style", EnumSpec::new(["novel", "essay", "poetry"]).unwrap()),
//!     ColumnDecl::array("tags"),
//! ]).unwrap());
//!
//! // mutate a record with validation and dirty tracking
//! let mut book = Record::new(Arc::clone(&schema));
//! book.set("style", ColumnValue::enumeration("novel")).unwrap();
//! book.add("tags", json!("russian")).unwrap();
//! let cells = book.encode_dirty().unwrap();
//! assert_eq!(cells.len(), 2);
//!
//! // build a typed filter over the same columns
//! let predicate = Query::new(schema)
//!     .filter_eq("style", ColumnValue::enumeration("novel")).unwrap()
//!     .filter_contains("tags", json!("russian")).unwrap()
//!     .build()
//!     .unwrap();
//! # let _ = predicate;
//! ```

// Codec registry and built-in codecs
pub mod codec;

// Error taxonomy
pub mod error;

// Predicate fragments and rendering
pub mod predicate;

// Typed filter surface
pub mod query;

// Records with change tracking
pub mod record;

// Column declarations and the bound schema
pub mod schema;

#[doc(inline)]
pub use codec::{BlobValue, CodecRegistry, ColumnCodec};
#[doc(inline)]
pub use error::ColumnError;
#[doc(inline)]
pub use predicate::{ArrayMatchMode, Predicate};
#[doc(inline)]
pub use query::Query;
#[doc(inline)]
pub use record::{FieldValue, Record};
#[doc(inline)]
pub use schema::{BoundColumn, ColumnDecl, ColumnType, ColumnValue, EnumSpec, Schema};
