//! Storage-neutral filter predicate fragments.
//!
//! A `Predicate` is an abstract tree of `{AND, OR, NOT, EQUALS,
//! SUBSTRING_MATCH}` nodes referencing a column identifier and an encoded
//! literal. The query-execution layer renders this tree into its native
//! query language; [`render`] provides the sea-query rendering for storage
//! layers built on that stack.
//!
//! # Raw composition
//!
//! `Predicate::all`, `Predicate::any`, and `Predicate::not` compose
//! fragments that already exist. The typed advanced-column filters (enum
//! equality, array membership) are deliberately *not* reachable from here;
//! only the per-column [`Query`](crate::query::Query) surface emits them,
//! with validation and codec context bound in. This asymmetry is a
//! capability boundary, not an oversight.

pub mod render;
pub(crate) mod translate;

#[doc(inline)]
pub use render::to_condition;
#[doc(inline)]
pub use translate::ArrayMatchMode;

/// Abstract filter fragment referencing a column and an encoded literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every child matches
    And(Vec<Predicate>),
    /// At least one child matches
    Or(Vec<Predicate>),
    /// The child does not match
    Not(Box<Predicate>),
    /// Stored encoding equals the literal, byte for byte
    Equals { column: String, literal: Vec<u8> },
    /// Stored encoding contains the needle as a substring.
    ///
    /// Unanchored pattern match: storage indexes do not apply, and the
    /// execution layer degrades to a full-relation scan.
    SubstringMatch { column: String, needle: Vec<u8> },
}

impl Predicate {
    /// Conjunction of fragments
    #[must_use]
    pub fn all(parts: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::And(parts.into_iter().collect())
    }

    /// Disjunction of fragments
    #[must_use]
    pub fn any(parts: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::Or(parts.into_iter().collect())
    }

    /// Negation of a fragment
    #[must_use]
    pub fn not(inner: Predicate) -> Predicate {
        Predicate::Not(Box::new(inner))
    }
}
