//! Predicate tree and builder
//!
//! The builder turns a [`NormalizedFilter`] into an AND of predicate groups.
//! It is total: once normalization succeeded nothing here can fail, and the
//! resulting tree is independent of any query language.

use chrono::{DateTime, Utc};

use super::normalize::{FilterValue, NormalizedFilter, RangeBounds};
use super::schema::{Activity, EntitySchema, RangeShape, Relation, Target};

/// Typed comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Integral numbers stay integers so they compare exactly against INTEGER columns
    pub fn number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Self::Integer(n as i64)
        } else {
            Self::Real(n)
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

/// Abstract predicate over one entity collection
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq {
        column: &'static str,
        value: Value,
    },
    /// Inclusive bounds; at least one side is set
    Range {
        column: &'static str,
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Strict lower bound
    After {
        column: &'static str,
        value: Value,
    },
    /// Substring match, case-insensitive over ASCII letters
    Contains {
        column: &'static str,
        needle: String,
    },
    /// List-valued column shares at least one element with `values`
    ArrayIntersects {
        column: &'static str,
        values: Vec<String>,
    },
    In {
        column: &'static str,
        values: Vec<Value>,
    },
    IsNull {
        column: &'static str,
    },
    Not(Box<Predicate>),
    /// Predicate evaluated on the row reached through a one-hop relation
    Related {
        relation: &'static Relation,
        predicate: Box<Predicate>,
    },
    Or(Vec<Predicate>),
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn at_least(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Range {
            column,
            min: Some(value.into()),
            max: None,
        }
    }

    pub fn after(column: &'static str, value: impl Into<Value>) -> Self {
        Self::After {
            column,
            value: value.into(),
        }
    }

    pub fn at_most(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Range {
            column,
            min: None,
            max: Some(value.into()),
        }
    }

    pub fn contains(column: &'static str, needle: &str) -> Self {
        Self::Contains {
            column,
            needle: needle.to_ascii_lowercase(),
        }
    }

    pub fn related(relation: &'static Relation, predicate: Predicate) -> Self {
        Self::Related {
            relation,
            predicate: Box::new(predicate),
        }
    }

    pub fn not(predicate: Predicate) -> Self {
        Self::Not(Box::new(predicate))
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Self::And(predicates)
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Self::Or(predicates)
    }

    /// Conjuncts of a top-level AND, or the predicate itself
    pub fn conjuncts(&self) -> &[Predicate] {
        match self {
            Self::And(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }
}

/// Request-independent inputs the builder may need
#[derive(Debug, Clone, Copy)]
pub struct BuildContext {
    pub now: DateTime<Utc>,
}

impl BuildContext {
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }
}

/// Build the predicate tree for a normalized filter
///
/// Layout of the returned `And`: base activity predicate (if any), then one
/// group per field in schema order, then range bounds, then the free-text
/// OR-group.
pub fn build(filter: &NormalizedFilter, schema: &EntitySchema, ctx: &BuildContext) -> Predicate {
    let mut groups = Vec::new();

    if let Activity::Active(column) = schema.activity {
        let active = schema
            .fields
            .iter()
            .filter(|f| matches!(f.target, Target::Activity))
            .find_map(|f| filter.get(f.name))
            .and_then(FilterValue::as_bool)
            .unwrap_or(true);
        groups.push(Predicate::eq(column, active));
    }

    for field in schema.fields {
        let Some(value) = filter.get(field.name) else {
            continue;
        };
        if let Some(predicate) = field_predicate(field.target, value, ctx) {
            groups.push(predicate);
        }
    }

    for range in schema.ranges {
        if let Some(bounds) = filter.range(range.name) {
            groups.extend(range_predicates(range.shape, bounds));
        }
    }

    if let (Some(search), Some(term)) = (&schema.search, filter.search.as_deref()) {
        groups.push(Predicate::or(
            search
                .columns
                .iter()
                .map(|column| Predicate::contains(column, term))
                .collect(),
        ));
    }

    Predicate::and(groups)
}

fn field_predicate(target: Target, value: &FilterValue, ctx: &BuildContext) -> Option<Predicate> {
    match (target, value) {
        (Target::Activity, _) => None,
        (Target::Build(build), value) => build(value, ctx),
        (Target::Eq(column), value) => Some(Predicate::eq(column, value.to_value()?)),
        (Target::NotEq(column), value) => {
            Some(Predicate::not(Predicate::eq(column, value.to_value()?)))
        }
        (Target::Contains(column), FilterValue::Text(text)) => {
            Some(Predicate::contains(column, text))
        }
        (Target::ContainsAny(column), FilterValue::Text(text)) => {
            Some(Predicate::contains(column, text))
        }
        (Target::ContainsAny(column), FilterValue::List(items)) => Some(Predicate::or(
            items
                .iter()
                .map(|item| Predicate::contains(column, item))
                .collect(),
        )),
        (Target::Intersects(column), FilterValue::List(items)) => {
            Some(Predicate::ArrayIntersects {
                column,
                values: items.clone(),
            })
        }
        (Target::AtLeast(column), value) => Some(Predicate::at_least(column, value.to_value()?)),
        (Target::AtMost(column), value) => Some(Predicate::at_most(column, value.to_value()?)),
        (Target::Contains(_) | Target::ContainsAny(_) | Target::Intersects(_), value) => {
            debug_assert!(false, "{:?} cannot take {:?}", target, value);
            None
        }
    }
}

fn range_predicates(shape: RangeShape, bounds: &RangeBounds) -> Vec<Predicate> {
    let mut out = Vec::with_capacity(2);
    match shape {
        RangeShape::Scalar(column) => {
            if let Some(min) = bounds.min {
                out.push(Predicate::at_least(column, Value::number(min)));
            }
            if let Some(max) = bounds.max {
                out.push(Predicate::at_most(column, Value::number(max)));
            }
        }
        RangeShape::Overlap {
            min_column,
            max_column,
        } => {
            // entity interval must intersect [min, max]
            if let Some(min) = bounds.min {
                out.push(Predicate::at_least(max_column, Value::number(min)));
            }
            if let Some(max) = bounds.max {
                out.push(Predicate::at_most(min_column, Value::number(max)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::schema::{FieldKind, FieldSpec, RangeSpec, TextSearch, Window};
    use crate::domain::search::sort::{Direction, SortKey, SortSpec};

    static OWNER: Relation = Relation {
        table: "users",
        foreign_key: "user_id",
        primary_key: "id",
    };

    fn verified_owner(value: &FilterValue, _: &BuildContext) -> Option<Predicate> {
        (value.as_bool() == Some(true))
            .then(|| Predicate::related(&OWNER, Predicate::eq("phone_verified", true)))
    }

    static SCHEMA: EntitySchema = EntitySchema {
        name: "things",
        fields: &[
            FieldSpec::new("city", FieldKind::Text, Target::Contains("city")),
            FieldSpec::new("petsAllowed", FieldKind::Boolean, Target::Eq("pets_allowed")),
            FieldSpec::new("amenities", FieldKind::TextList, Target::Intersects("amenities")),
            FieldSpec::new("verifiedOnly", FieldKind::Boolean, Target::Build(verified_owner)),
            FieldSpec::new("isActive", FieldKind::Boolean, Target::Activity),
        ],
        ranges: &[
            RangeSpec {
                name: "rent",
                min_aliases: &["minRent"],
                max_aliases: &["maxRent"],
                shape: RangeShape::Scalar("rent"),
                strict: false,
                min_window: Window::ANY,
                max_window: Window::ANY,
            },
            RangeSpec {
                name: "budget",
                min_aliases: &["budgetMin"],
                max_aliases: &["budgetMax"],
                shape: RangeShape::Overlap {
                    min_column: "budget_min",
                    max_column: "budget_max",
                },
                strict: true,
                min_window: Window::ANY,
                max_window: Window::ANY,
            },
        ],
        search: Some(TextSearch {
            param: "search",
            columns: &["title", "city"],
        }),
        sort: SortSpec {
            param: "sortBy",
            order_param: None,
            options: &[],
            default: SortKey {
                column: "created_at",
                direction: Direction::Desc,
            },
        },
        activity: Activity::Active("is_active"),
        strict_paging: false,
    };

    fn ctx() -> BuildContext {
        BuildContext::now()
    }

    #[test]
    fn test_empty_filter_has_only_base() {
        let pred = build(&NormalizedFilter::default(), &SCHEMA, &ctx());
        assert_eq!(pred, Predicate::and(vec![Predicate::eq("is_active", true)]));
    }

    #[test]
    fn test_activity_override() {
        let mut filter = NormalizedFilter::default();
        filter.insert("isActive", FilterValue::Bool(false));
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(pred.conjuncts(), &[Predicate::eq("is_active", false)]);
    }

    #[test]
    fn test_each_field_contributes_one_predicate() {
        let mut filter = NormalizedFilter::default();
        filter.insert("city", FilterValue::Text("Austin".into()));
        filter.insert("petsAllowed", FilterValue::Bool(false));
        filter.insert(
            "amenities",
            FilterValue::List(vec!["wifi".into(), "gym".into()]),
        );
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            pred.conjuncts(),
            &[
                Predicate::eq("is_active", true),
                Predicate::contains("city", "austin"),
                Predicate::eq("pets_allowed", false),
                Predicate::ArrayIntersects {
                    column: "amenities",
                    values: vec!["wifi".into(), "gym".into()],
                },
            ]
        );
    }

    #[test]
    fn test_scalar_range_bounds() {
        let mut filter = NormalizedFilter::default();
        filter.insert_range(
            "rent",
            RangeBounds {
                min: Some(500.0),
                max: Some(1500.0),
            },
        );
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            &pred.conjuncts()[1..],
            &[
                Predicate::at_least("rent", 500i64),
                Predicate::at_most("rent", 1500i64),
            ]
        );
    }

    #[test]
    fn test_overlap_range_swaps_columns() {
        let mut filter = NormalizedFilter::default();
        filter.insert_range(
            "budget",
            RangeBounds {
                min: Some(800.0),
                max: None,
            },
        );
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            &pred.conjuncts()[1..],
            &[Predicate::at_least("budget_max", 800i64)]
        );

        let mut filter = NormalizedFilter::default();
        filter.insert_range(
            "budget",
            RangeBounds {
                min: None,
                max: Some(1200.0),
            },
        );
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            &pred.conjuncts()[1..],
            &[Predicate::at_most("budget_min", 1200i64)]
        );
    }

    #[test]
    fn test_search_is_or_group_anded_with_filters() {
        let mut filter = NormalizedFilter::default();
        filter.insert("city", FilterValue::Text("Chicago".into()));
        filter.search = Some("Sunny".into());
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            pred.conjuncts(),
            &[
                Predicate::eq("is_active", true),
                Predicate::contains("city", "chicago"),
                Predicate::or(vec![
                    Predicate::contains("title", "sunny"),
                    Predicate::contains("city", "sunny"),
                ]),
            ]
        );
    }

    #[test]
    fn test_verified_only_traverses_relation() {
        let mut filter = NormalizedFilter::default();
        filter.insert("verifiedOnly", FilterValue::Bool(true));
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(
            pred.conjuncts()[1],
            Predicate::related(&OWNER, Predicate::eq("phone_verified", true))
        );

        let mut filter = NormalizedFilter::default();
        filter.insert("verifiedOnly", FilterValue::Bool(false));
        let pred = build(&filter, &SCHEMA, &ctx());
        assert_eq!(pred.conjuncts().len(), 1);
    }

    #[test]
    fn test_value_number() {
        assert_eq!(Value::number(10.0), Value::Integer(10));
        assert_eq!(Value::number(10.5), Value::Real(10.5));
    }

    #[test]
    #[should_panic(expected = "cannot take")]
    fn test_mismatched_target_is_caught() {
        field_predicate(
            Target::Contains("city"),
            &FilterValue::Number(3.0),
            &BuildContext::now(),
        );
    }
}
