//! Predicate tree to sea-query condition rendering.
//!
//! The execution layer owns the final query language; this module provides
//! the rendering for storage layers built on sea-query. `Equals` becomes a
//! column/value equality expression, `SubstringMatch` a `LIKE '%needle%'`
//! with `%`, `_`, and `\` escaped so the needle only ever matches
//! literally.

use sea_query::{Alias, Condition, Expr, ExprTrait, LikeExpr};

use crate::error::ColumnError;

use super::Predicate;

fn literal_text<'a>(column: &str, bytes: &'a [u8]) -> Result<&'a str, ColumnError> {
    std::str::from_utf8(bytes).map_err(|_| ColumnError::CorruptEncoding {
        column: column.to_string(),
        detail: "predicate literal is not valid UTF-8".to_string(),
    })
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Render a predicate tree as a `sea_query::Condition`.
///
/// All built-in codecs emit UTF-8 text encodings; a non-UTF-8 literal
/// (from a foreign codec) fails with `CorruptEncoding`.
///
/// # Example
///
/// ```
/// use buoy::predicate::{to_condition, Predicate};
///
/// let predicate = Predicate::Equals {
///     column: "style".to_string(),
///     literal: b"1".to_vec(),
/// };
/// let condition = to_condition(&predicate).unwrap();
/// # let _ = condition;
/// ```
pub fn to_condition(predicate: &Predicate) -> Result<Condition, ColumnError> {
    match predicate {
        Predicate::And(children) => {
            let mut condition = Condition::all();
            for child in children {
                condition = condition.add(to_condition(child)?);
            }
            Ok(condition)
        }
        Predicate::Or(children) => {
            let mut condition = Condition::any();
            for child in children {
                condition = condition.add(to_condition(child)?);
            }
            Ok(condition)
        }
        Predicate::Not(inner) => Ok(to_condition(inner)?.not()),
        Predicate::Equals { column, literal } => {
            let text = literal_text(column, literal)?;
            Ok(Condition::all()
                .add(Expr::col(Alias::new(column)).eq(text.to_string())))
        }
        Predicate::SubstringMatch { column, needle } => {
            let text = literal_text(column, needle)?;
            let pattern = format!("%{}%", escape_like(text));
            Ok(Condition::all()
                .add(Expr::col(Alias::new(column)).like(LikeExpr::new(pattern).escape('\\'))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{Asterisk, PostgresQueryBuilder, Query};

    fn render(predicate: &Predicate) -> String {
        Query::select()
            .column(Asterisk)
            .from(Alias::new("book"))
            .cond_where(to_condition(predicate).unwrap())
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn test_render_equals() {
        let sql = render(&Predicate::Equals {
            column: "style".to_string(),
            literal: b"1".to_vec(),
        });
        assert!(sql.contains("style"), "sql: {}", sql);
        assert!(sql.contains('1'), "sql: {}", sql);
    }

    #[test]
    fn test_render_substring_match_is_like() {
        let sql = render(&Predicate::SubstringMatch {
            column: "tags".to_string(),
            needle: br#"| "novel" |"#.to_vec(),
        });
        assert!(sql.contains("LIKE"), "sql: {}", sql);
        assert!(sql.contains('%'), "sql: {}", sql);
        assert!(sql.contains("ESCAPE"), "sql: {}", sql);
    }

    #[test]
    fn test_render_not_or_tree() {
        let sql = render(&Predicate::not(Predicate::any([
            Predicate::SubstringMatch {
                column: "tags".to_string(),
                needle: br#"| "fantasy" |"#.to_vec(),
            },
            Predicate::SubstringMatch {
                column: "tags".to_string(),
                needle: br#"| "horror" |"#.to_vec(),
            },
        ])));
        assert!(sql.contains("NOT"), "sql: {}", sql);
        assert!(sql.contains("OR"), "sql: {}", sql);
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        let pattern = escape_like(r#"| "100%_sure" |"#);
        assert!(pattern.contains("\\%"));
        assert!(pattern.contains("\\_"));
    }

    #[test]
    fn test_non_utf8_literal_is_corrupt() {
        let err = to_condition(&Predicate::Equals {
            column: "style".to_string(),
            literal: vec![0xff, 0xfe],
        })
        .unwrap_err();
        assert!(matches!(err, ColumnError::CorruptEncoding { .. }));
    }
}
