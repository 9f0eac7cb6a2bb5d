//! Typed filter requests to predicate fragments.
//!
//! Translation is where a filter request meets a column's codec: the
//! candidate value is validated and encoded exactly as it would be for
//! storage, then wrapped in the fragment shape the encoding supports:
//! byte-exact equality for enum and object columns, boundary-marked
//! substring membership for array columns. Blob columns support no filters
//! at all.
//!
//! Substring fragments are unanchored pattern matches: they bypass storage
//! indexes and force a full-relation scan. Every membership translation
//! reports this through the scan advisory, `log::warn!` by default or a
//! caller-installed callback.

use crate::codec::array::{element_token, marked};
use crate::error::ColumnError;
use crate::schema::{BoundColumn, ColumnType, ColumnValue};

use super::Predicate;

/// Match mode for array membership filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayMatchMode {
    /// Every requested element is present
    ContainsAll,
    /// At least one requested element is present
    ContainsSome,
    /// No requested element is present
    ContainsNone,
}

/// Callback invoked when a translation emits index-defeating fragments
pub(crate) type ScanAdvisory = dyn Fn(&str) + Send + Sync;

fn advise(advisory: Option<&ScanAdvisory>, column: &str) {
    let message = format!(
        "membership filter on column {} is an unanchored pattern match; \
         storage indexes do not apply and the query degrades to a full scan",
        column
    );
    match advisory {
        Some(callback) => callback(&message),
        None => log::warn!("{}", message),
    }
}

/// Byte-exact equality fragment for enum and object columns.
///
/// The candidate is validated and encoded with the column's codec, so an
/// enum non-member fails with `InvalidEnumValue` here instead of emitting
/// a fragment guaranteed to match nothing.
pub(crate) fn equals(bound: &BoundColumn, value: ColumnValue) -> Result<Predicate, ColumnError> {
    match bound.column_type() {
        ColumnType::Enum | ColumnType::Object => {
            bound.codec().validate(&value)?;
            let literal = bound.codec().encode(value)?;
            Ok(Predicate::Equals {
                column: bound.name().to_string(),
                literal,
            })
        }
        // blob filters are unsupported outright; array equality is routed
        // through the membership modes
        ColumnType::Blob | ColumnType::Array => Err(ColumnError::UnsupportedFilterTarget {
            column: bound.name().to_string(),
            column_type: bound.column_type(),
        }),
    }
}

/// Membership fragment for array columns.
///
/// One boundary-marked substring fragment per requested element, combined
/// per the mode: `ContainsAll` is their conjunction, `ContainsSome` their
/// disjunction, `ContainsNone` the negated disjunction.
pub(crate) fn array_membership(
    bound: &BoundColumn,
    values: &[serde_json::Value],
    mode: ArrayMatchMode,
    advisory: Option<&ScanAdvisory>,
) -> Result<Predicate, ColumnError> {
    if bound.column_type() != ColumnType::Array {
        return Err(ColumnError::UnsupportedFilterTarget {
            column: bound.name().to_string(),
            column_type: bound.column_type(),
        });
    }
    if values.is_empty() {
        return Err(ColumnError::UnsupportedValueKind {
            column: bound.name().to_string(),
            expected: "at least one element to match",
            actual: "empty element list".to_string(),
        });
    }

    let mut fragments = Vec::with_capacity(values.len());
    for value in values {
        let token = element_token(bound.name(), value)?;
        fragments.push(Predicate::SubstringMatch {
            column: bound.name().to_string(),
            needle: marked(&token).into_bytes(),
        });
    }
    advise(advisory, bound.name());

    Ok(match mode {
        ArrayMatchMode::ContainsAll => Predicate::And(fragments),
        ArrayMatchMode::ContainsSome => Predicate::Or(fragments),
        ArrayMatchMode::ContainsNone => Predicate::not(Predicate::Or(fragments)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDecl, EnumSpec, Schema};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDecl::enumeration("style", EnumSpec::new(["novel", "essay"]).unwrap()),
            ColumnDecl::array("tags"),
            ColumnDecl::object("details"),
            ColumnDecl::blob("cover_image"),
        ])
        .unwrap()
    }

    #[test]
    fn test_enum_equals_encodes_ordinal() {
        let schema = schema();
        let predicate = equals(
            schema.column("style").unwrap(),
            ColumnValue::enumeration("essay"),
        )
        .unwrap();
        assert_eq!(
            predicate,
            Predicate::Equals {
                column: "style".to_string(),
                literal: b"1".to_vec(),
            }
        );
    }

    #[test]
    fn test_enum_equals_rejects_non_member() {
        let schema = schema();
        let err = equals(
            schema.column("style").unwrap(),
            ColumnValue::enumeration("thriller"),
        )
        .unwrap_err();
        assert!(matches!(err, ColumnError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_object_equals_uses_canonical_encoding() {
        let schema = schema();
        let predicate = equals(
            schema.column("details").unwrap(),
            ColumnValue::object(json!({"pages": 320})),
        )
        .unwrap();
        match predicate {
            Predicate::Equals { column, literal } => {
                assert_eq!(column, "details");
                assert!(literal.starts_with(b"v1:"));
            }
            other => panic!("expected Equals, got {:?}", other),
        }
    }

    #[test]
    fn test_blob_filters_unsupported() {
        let schema = schema();
        let bound = schema.column("cover_image").unwrap();
        assert!(matches!(
            equals(bound, ColumnValue::object(json!(1))).unwrap_err(),
            ColumnError::UnsupportedFilterTarget { .. }
        ));
        assert!(matches!(
            array_membership(bound, &[json!("x")], ArrayMatchMode::ContainsAll, None).unwrap_err(),
            ColumnError::UnsupportedFilterTarget { .. }
        ));
    }

    #[test]
    fn test_membership_modes_shape() {
        let schema = schema();
        let bound = schema.column("tags").unwrap();
        let values = [json!("novel"), json!("russian")];

        let all = array_membership(bound, &values, ArrayMatchMode::ContainsAll, None).unwrap();
        assert!(matches!(&all, Predicate::And(f) if f.len() == 2));

        let some = array_membership(bound, &values, ArrayMatchMode::ContainsSome, None).unwrap();
        assert!(matches!(&some, Predicate::Or(f) if f.len() == 2));

        let none = array_membership(bound, &values, ArrayMatchMode::ContainsNone, None).unwrap();
        match none {
            Predicate::Not(inner) => assert!(matches!(*inner, Predicate::Or(f) if f.len() == 2)),
            other => panic!("expected Not, got {:?}", other),
        }
    }

    #[test]
    fn test_membership_needles_are_boundary_marked() {
        let schema = schema();
        let bound = schema.column("tags").unwrap();
        let predicate =
            array_membership(bound, &[json!("novel")], ArrayMatchMode::ContainsAll, None).unwrap();
        match predicate {
            Predicate::And(fragments) => match &fragments[0] {
                Predicate::SubstringMatch { needle, .. } => {
                    assert_eq!(needle, br#"| "novel" |"#);
                }
                other => panic!("expected SubstringMatch, got {:?}", other),
            },
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_membership_rejects_empty_and_nested() {
        let schema = schema();
        let bound = schema.column("tags").unwrap();
        assert!(matches!(
            array_membership(bound, &[], ArrayMatchMode::ContainsAll, None).unwrap_err(),
            ColumnError::UnsupportedValueKind { .. }
        ));
        assert!(matches!(
            array_membership(bound, &[json!(["nested"])], ArrayMatchMode::ContainsAll, None)
                .unwrap_err(),
            ColumnError::InvalidArrayShape { .. }
        ));
    }

    #[test]
    fn test_advisory_callback_fires() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        let schema = schema();
        let bound = schema.column("tags").unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_cb = Arc::clone(&calls);
        let advisory = move |_msg: &str| {
            calls_in_cb.fetch_add(1, Ordering::SeqCst);
        };
        array_membership(
            bound,
            &[json!("a"), json!("b")],
            ArrayMatchMode::ContainsSome,
            Some(&advisory),
        )
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
