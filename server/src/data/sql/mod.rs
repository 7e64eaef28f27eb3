//! Predicate tree → SQLite SQL
//!
//! Column and table names come only from static entity schemas. Every value
//! is bound as a typed `?` parameter in the order it appears in the text.

use chrono::SecondsFormat;
use sqlx::Arguments;
use sqlx::sqlite::SqliteArguments;

use crate::domain::search::{Predicate, SortKey, Value};
use crate::utils::sql::escape_like_pattern;

/// Alias used for the related row inside `EXISTS` subqueries
const RELATED_ALIAS: &str = "r";

/// Typed bind value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

impl From<&Value> for SqlValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Text(s) => Self::Text(s.clone()),
            Value::Integer(n) => Self::Integer(*n),
            Value::Real(n) => Self::Real(*n),
            Value::Bool(b) => Self::Bool(*b),
            Value::Timestamp(ts) => Self::Text(format_timestamp(ts)),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Canonical stored timestamp text, e.g. `2025-01-01T00:00:00Z`
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Clone, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn push(&mut self, value: impl Into<SqlValue>) {
        self.values.push(value.into());
    }

    /// Bind all collected values for a sqlx query
    pub fn to_arguments(&self) -> Result<SqliteArguments<'static>, sqlx::Error> {
        let mut args = SqliteArguments::default();
        for value in &self.values {
            let added = match value {
                SqlValue::Text(s) => args.add(s.clone()),
                SqlValue::Integer(n) => args.add(*n),
                SqlValue::Real(n) => args.add(*n),
                SqlValue::Bool(b) => args.add(*b),
            };
            added.map_err(sqlx::Error::Encode)?;
        }
        Ok(args)
    }
}

/// Compiled `WHERE` body plus its binds
#[derive(Debug, Clone)]
pub struct WhereClause {
    pub sql: String,
    pub params: SqlParams,
}

impl WhereClause {
    pub fn new(predicate: &Predicate, alias: &str) -> Self {
        let mut params = SqlParams::default();
        let sql = predicate_to_sql(predicate, alias, &mut params);
        Self { sql, params }
    }
}

fn column(alias: &str, col: &str) -> String {
    if alias.is_empty() {
        col.to_string()
    } else {
        format!("{}.{}", alias, col)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Generate a SQL boolean expression for a predicate
pub fn predicate_to_sql(predicate: &Predicate, alias: &str, params: &mut SqlParams) -> String {
    match predicate {
        Predicate::Eq { column: col, value } => {
            params.push(value);
            format!("{} = ?", column(alias, col))
        }
        Predicate::Range {
            column: col,
            min,
            max,
        } => {
            let col = column(alias, col);
            match (min, max) {
                (Some(min), Some(max)) => {
                    params.push(min);
                    params.push(max);
                    format!("({} >= ? AND {} <= ?)", col, col)
                }
                (Some(min), None) => {
                    params.push(min);
                    format!("{} >= ?", col)
                }
                (None, Some(max)) => {
                    params.push(max);
                    format!("{} <= ?", col)
                }
                (None, None) => "1".to_string(),
            }
        }
        Predicate::After { column: col, value } => {
            params.push(value);
            format!("{} > ?", column(alias, col))
        }
        // SQLite LOWER() folds ASCII only, so the needle is folded the same way
        Predicate::Contains {
            column: col,
            needle,
        } => {
            params.push(format!("%{}%", escape_like_pattern(&needle.to_ascii_lowercase())));
            format!("LOWER({}) LIKE ? ESCAPE '\\'", column(alias, col))
        }
        Predicate::ArrayIntersects {
            column: col,
            values,
        } => {
            if values.is_empty() {
                return "0".to_string();
            }
            for v in values {
                params.push(v.as_str());
            }
            format!(
                "EXISTS (SELECT 1 FROM json_each({}) WHERE json_each.value IN ({}))",
                column(alias, col),
                placeholders(values.len())
            )
        }
        Predicate::In {
            column: col,
            values,
        } => {
            if values.is_empty() {
                return "0".to_string();
            }
            for v in values {
                params.push(v);
            }
            format!("{} IN ({})", column(alias, col), placeholders(values.len()))
        }
        Predicate::IsNull { column: col } => format!("{} IS NULL", column(alias, col)),
        Predicate::Not(inner) => format!("NOT ({})", predicate_to_sql(inner, alias, params)),
        Predicate::Related {
            relation,
            predicate,
        } => {
            let inner = predicate_to_sql(predicate, RELATED_ALIAS, params);
            format!(
                "EXISTS (SELECT 1 FROM {table} {r} WHERE {r}.{pk} = {fk} AND {inner})",
                table = relation.table,
                r = RELATED_ALIAS,
                pk = relation.primary_key,
                fk = column(alias, relation.foreign_key),
                inner = inner,
            )
        }
        Predicate::And(parts) => join(parts, " AND ", "1", alias, params),
        Predicate::Or(parts) => join(parts, " OR ", "0", alias, params),
    }
}

fn join(
    parts: &[Predicate],
    separator: &str,
    empty: &str,
    alias: &str,
    params: &mut SqlParams,
) -> String {
    match parts {
        [] => empty.to_string(),
        [only] => predicate_to_sql(only, alias, params),
        _ => {
            let clauses: Vec<String> = parts
                .iter()
                .map(|p| predicate_to_sql(p, alias, params))
                .collect();
            format!("({})", clauses.join(separator))
        }
    }
}

/// `ORDER BY` body for a sort key
pub fn order_by(sort: &SortKey, alias: &str) -> String {
    format!("{} {}", column(alias, sort.column), sort.direction.as_sql())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::entities::LISTING_OWNER;
    use chrono::{TimeZone, Utc};

    fn compile(predicate: &Predicate) -> (String, Vec<SqlValue>) {
        let clause = WhereClause::new(predicate, "l");
        (clause.sql, clause.params.values)
    }

    #[test]
    fn test_eq_and_range() {
        let pred = Predicate::and(vec![
            Predicate::eq("is_active", true),
            Predicate::at_least("rent", 100i64),
            Predicate::Range {
                column: "age",
                min: Some(Value::Integer(20)),
                max: Some(Value::Real(30.5)),
            },
        ]);
        let (sql, values) = compile(&pred);
        assert_eq!(
            sql,
            "(l.is_active = ? AND l.rent >= ? AND (l.age >= ? AND l.age <= ?))"
        );
        assert_eq!(
            values,
            vec![
                SqlValue::Bool(true),
                SqlValue::Integer(100),
                SqlValue::Integer(20),
                SqlValue::Real(30.5),
            ]
        );
    }

    #[test]
    fn test_contains_escapes_and_lowercases() {
        let pred = Predicate::Contains {
            column: "title",
            needle: "100%_Sunny".to_string(),
        };
        let (sql, values) = compile(&pred);
        assert_eq!(sql, r"LOWER(l.title) LIKE ? ESCAPE '\'");
        assert_eq!(values, vec![SqlValue::Text(r"%100\%\_sunny%".to_string())]);

        let (_, values) = compile(&Predicate::contains("city", "ÅRHUS"));
        assert_eq!(values, vec![SqlValue::Text("%Århus%".to_string())]);
    }

    #[test]
    fn test_after_is_strict() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let (sql, values) = compile(&Predicate::after("suspended_until", now));
        assert_eq!(sql, "l.suspended_until > ?");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_array_intersects() {
        let pred = Predicate::ArrayIntersects {
            column: "amenities",
            values: vec!["wifi".into(), "gym".into()],
        };
        let (sql, values) = compile(&pred);
        assert_eq!(
            sql,
            "EXISTS (SELECT 1 FROM json_each(l.amenities) WHERE json_each.value IN (?, ?))"
        );
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(compile(&Predicate::and(vec![])).0, "1");
        assert_eq!(compile(&Predicate::or(vec![])).0, "0");
        assert_eq!(
            compile(&Predicate::In {
                column: "type",
                values: vec![]
            })
            .0,
            "0"
        );
    }

    #[test]
    fn test_or_and_not() {
        let pred = Predicate::and(vec![
            Predicate::or(vec![
                Predicate::contains("title", "a"),
                Predicate::contains("city", "a"),
            ]),
            Predicate::not(Predicate::eq("id", "x")),
            Predicate::IsNull {
                column: "suspended_until",
            },
        ]);
        let (sql, _) = compile(&pred);
        assert_eq!(
            sql,
            r"((LOWER(l.title) LIKE ? ESCAPE '\' OR LOWER(l.city) LIKE ? ESCAPE '\') AND NOT (l.id = ?) AND l.suspended_until IS NULL)"
        );
    }

    #[test]
    fn test_related() {
        let pred = Predicate::related(&LISTING_OWNER, Predicate::eq("phone_verified", true));
        let (sql, values) = compile(&pred);
        assert_eq!(
            sql,
            "EXISTS (SELECT 1 FROM users r WHERE r.id = l.user_id AND r.phone_verified = ?)"
        );
        assert_eq!(values, vec![SqlValue::Bool(true)]);
    }

    #[test]
    fn test_timestamp_binds_as_text() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let (_, values) = compile(&Predicate::at_most("available_from", ts));
        assert_eq!(
            values,
            vec![SqlValue::Text("2025-03-01T12:00:00Z".to_string())]
        );
    }

    #[test]
    fn test_order_by() {
        assert_eq!(order_by(&SortKey::asc("rent"), "l"), "l.rent ASC");
        assert_eq!(order_by(&SortKey::desc("created_at"), ""), "created_at DESC");
    }

    #[test]
    fn test_to_arguments() {
        let mut params = SqlParams::default();
        params.push("a");
        params.push(1i64);
        params.values.push(SqlValue::Real(1.5));
        params.values.push(SqlValue::Bool(false));
        assert!(params.to_arguments().is_ok());
    }
}
