//! Column declarations, enum specs, and the bound schema.
//!
//! This module is the descriptor table the rest of the crate consumes: an
//! ordered list of `ColumnDecl`s describes the advanced columns of one
//! relation, and `Schema` binds that list to codec instances. Generated
//! per-column accessors are deliberately replaced by this explicit data
//! model; callers address columns by name through generic, typed entry
//! points instead of per-column generated methods.

// Declarations and values
pub mod column;
#[doc(inline)]
pub use column::{ColumnDecl, ColumnType, ColumnValue, EnumSpec};

// Bound schema
pub mod registry;
#[doc(inline)]
pub use registry::{BoundColumn, Schema};
