//! Parameter Normalizer
//!
//! Turns a raw [`SearchRequest`] into a typed [`NormalizedFilter`] plus a
//! [`Page`], driven entirely by an [`EntitySchema`]. Lenient fields drop
//! anything they cannot use; strict fields report it. All issues are
//! collected before the request is rejected.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::error::{ValidationError, ValidationIssue};
use super::page::{Page, PageLimits};
use super::params::SearchRequest;
use super::predicate::Value;
use super::schema::{EntitySchema, FieldKind, FieldSpec, RangeSpec, Window};
use super::sort::SortKey;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";

/// Typed value of one normalized field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Bool(bool),
    /// Canonical upper-case enum value
    Enum(&'static str),
    Text(String),
    List(Vec<String>),
    Date(DateTime<Utc>),
    /// Hyphenated lower-case UUID
    Id(String),
}

impl FilterValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Scalar comparison operand; lists have none
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            Self::Number(n) => Value::number(*n),
            Self::Bool(b) => Value::Bool(*b),
            Self::Enum(e) => Value::Text((*e).to_string()),
            Self::Text(t) | Self::Id(t) => Value::Text(t.clone()),
            Self::Date(d) => Value::Timestamp(*d),
            Self::List(_) => return None,
        })
    }
}

/// Resolved bounds of one range; at least one side is set when stored
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Typed, validated filter for one surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFilter {
    values: Vec<(&'static str, FilterValue)>,
    ranges: Vec<(&'static str, RangeBounds)>,
    /// Trimmed free-text term
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

impl NormalizedFilter {
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn insert(&mut self, name: &'static str, value: FilterValue) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn range(&self, name: &str) -> Option<&RangeBounds> {
        self.ranges.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    pub fn insert_range(&mut self, name: &'static str, bounds: RangeBounds) {
        match self.ranges.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = bounds,
            None => self.ranges.push((name, bounds)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.ranges.is_empty() && self.search.is_none()
    }
}

/// Normalize a raw request against a surface schema
pub fn normalize(
    request: &SearchRequest,
    schema: &EntitySchema,
    limits: &PageLimits,
) -> Result<(NormalizedFilter, Page), ValidationError> {
    let mut issues = Vec::new();
    let mut filter = NormalizedFilter::default();

    for field in schema.fields {
        match normalize_field(request, field) {
            Ok(Some(value)) => filter.insert(field.name, value),
            Ok(None) => {}
            Err(issue) => issues.push(issue),
        }
    }

    for range in schema.ranges {
        match normalize_range(request, range) {
            Ok(Some(bounds)) => filter.insert_range(range.name, bounds),
            Ok(None) => {}
            Err(mut errs) => issues.append(&mut errs),
        }
    }

    if let Some(search) = &schema.search {
        filter.search = request
            .first(&[search.param])
            .map(|(_, term)| term.to_string());
    }

    filter.sort = Some(schema.sort.select(request));

    let page = normalize_page(request, schema.strict_paging, limits, &mut issues);

    if !issues.is_empty() {
        tracing::debug!(surface = schema.name, issues = issues.len(), "Search rejected");
        return Err(ValidationError::new(issues));
    }

    tracing::debug!(surface = schema.name, ?filter, ?page, "Normalized search filter");
    Ok((filter, page))
}

fn normalize_field(
    request: &SearchRequest,
    field: &FieldSpec,
) -> Result<Option<FilterValue>, ValidationIssue> {
    if let FieldKind::TextList = field.kind {
        return Ok(request
            .resolve(field.param_names())
            .map(|(_, values)| split_list(values))
            .filter(|items| !items.is_empty())
            .map(FilterValue::List));
    }

    let Some((param, raw)) = request.first(field.param_names()) else {
        return Ok(None);
    };

    let parsed = match field.kind {
        FieldKind::Number => {
            return parse_number(param, raw, field.strict, field.window).map(|n| {
                n.map(FilterValue::Number)
            });
        }
        FieldKind::Boolean => parse_bool(raw).map(FilterValue::Bool),
        FieldKind::Enum(spec) => match spec.canonical(raw) {
            Some(value) if spec.is_wildcard(value) => return Ok(None),
            Some(value) => Some(FilterValue::Enum(value)),
            None if field.strict => {
                return Err(ValidationIssue::query(
                    param,
                    "INVALID_ENUM",
                    format!("{} must be one of: {}", param, spec.describe()),
                ));
            }
            None => None,
        },
        FieldKind::Text => Some(FilterValue::Text(raw.to_string())),
        FieldKind::Date => parse_date(raw).map(FilterValue::Date),
        FieldKind::Uuid => Uuid::parse_str(raw)
            .ok()
            .map(|id| FilterValue::Id(id.to_string())),
        FieldKind::TextList => None,
    };

    match parsed {
        Some(value) => Ok(Some(value)),
        None if field.strict => Err(invalid(param, field.kind)),
        None => Ok(None),
    }
}

fn invalid(param: &str, kind: FieldKind) -> ValidationIssue {
    let (code, expected) = match kind {
        FieldKind::Boolean => ("INVALID_BOOLEAN", "true or false"),
        FieldKind::Date => ("INVALID_DATE", "a valid date"),
        FieldKind::Uuid => ("INVALID_UUID", "a valid UUID"),
        _ => ("INVALID_VALUE", "a valid value"),
    };
    ValidationIssue::query(param, code, format!("{} must be {}", param, expected))
}

/// Strict: `^\d+$` or an issue. Lenient: any finite decimal inside `window`, else absent.
fn parse_number(
    param: &str,
    raw: &str,
    strict: bool,
    window: Window,
) -> Result<Option<f64>, ValidationIssue> {
    if strict && !is_digits(raw) {
        return Err(ValidationIssue::query(
            param,
            "INVALID_NUMBER",
            format!("{} must be a non-negative integer", param),
        ));
    }
    Ok(raw
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && window.contains(*n)))
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Flatten repeated values, split on commas, trim, drop empties, dedupe in order
fn split_list(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in values.iter().flat_map(|v| v.split(',')) {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
    out
}

fn normalize_range(
    request: &SearchRequest,
    range: &RangeSpec,
) -> Result<Option<RangeBounds>, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let mut bound = |aliases: &[&'static str], window: Window| {
        let (param, raw) = request.first(aliases)?;
        match parse_number(param, raw, range.strict, window) {
            Ok(value) => value.map(|v| (param, v)),
            Err(issue) => {
                issues.push(issue);
                None
            }
        }
    };

    let min = bound(range.min_aliases, range.min_window);
    let max = bound(range.max_aliases, range.max_window);
    if !issues.is_empty() {
        return Err(issues);
    }

    if let (Some((min_param, lo)), Some((max_param, hi))) = (min, max)
        && lo > hi
    {
        if range.strict {
            return Err(vec![ValidationIssue::query(
                min_param,
                "INVALID_RANGE",
                format!("{} must be less than or equal to {}", min_param, max_param),
            )]);
        }
        return Ok(None);
    }

    if min.is_none() && max.is_none() {
        return Ok(None);
    }
    Ok(Some(RangeBounds {
        min: min.map(|(_, v)| v),
        max: max.map(|(_, v)| v),
    }))
}

fn normalize_page(
    request: &SearchRequest,
    strict: bool,
    limits: &PageLimits,
    issues: &mut Vec<ValidationIssue>,
) -> Page {
    let mut read = |param: &'static str, default: u64| -> u64 {
        let Some((_, raw)) = request.first(&[param]) else {
            return default;
        };
        if is_digits(raw) {
            // overlong digit strings clamp like any other oversized value
            return raw.parse::<u64>().unwrap_or(u64::MAX);
        }
        if strict {
            issues.push(ValidationIssue::query(
                param,
                "INVALID_NUMBER",
                format!("{} must be a number", param),
            ));
        }
        default
    };

    let index = read(PAGE_PARAM, 1);
    let size = read(LIMIT_PARAM, limits.default_size as u64);
    Page::new(index, size, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::schema::{
        Activity, EnumSpec, RangeShape, Target, TextSearch,
    };
    use crate::domain::search::sort::SortSpec;

    static GENDER: EnumSpec = EnumSpec {
        values: &["MALE", "FEMALE", "ANY"],
        wildcard: Some("ANY"),
        aliases: &[],
    };

    static STATUS: EnumSpec = EnumSpec {
        values: &["ACTIVE", "INACTIVE"],
        wildcard: None,
        aliases: &[],
    };

    static LENIENT: EntitySchema = EntitySchema {
        name: "lenient",
        fields: &[
            FieldSpec::new("city", FieldKind::Text, Target::Contains("city"))
                .aliases(&["city", "location"]),
            FieldSpec::new("gender", FieldKind::Enum(&GENDER), Target::Eq("gender")),
            FieldSpec::new("isFlagged", FieldKind::Boolean, Target::Eq("is_flagged")),
            FieldSpec::new("amenities", FieldKind::TextList, Target::Intersects("amenities")),
            FieldSpec::new("availableFrom", FieldKind::Date, Target::AtMost("available_from")),
            FieldSpec::new("leaseLength", FieldKind::Number, Target::AtMost("lease_length"))
                .window(Window::POSITIVE),
        ],
        ranges: &[RangeSpec {
            name: "rent",
            min_aliases: &["minRent", "budgetMin", "minBudget"],
            max_aliases: &["maxRent", "budgetMax", "maxBudget"],
            shape: RangeShape::Scalar("rent"),
            strict: false,
            min_window: Window::POSITIVE,
            max_window: Window {
                above: Some(0.0),
                below: Some(1_000_000.0),
            },
        }],
        search: Some(TextSearch {
            param: "search",
            columns: &["title"],
        }),
        sort: SortSpec::fixed(SortKey::desc("created_at")),
        activity: Activity::Active("is_active"),
        strict_paging: false,
    };

    static STRICT: EntitySchema = EntitySchema {
        name: "strict",
        fields: &[
            FieldSpec::new("isActive", FieldKind::Boolean, Target::Activity).strict(),
            FieldSpec::new("status", FieldKind::Enum(&STATUS), Target::Eq("status")).strict(),
            FieldSpec::new("excludeId", FieldKind::Uuid, Target::NotEq("id")).strict(),
        ],
        ranges: &[RangeSpec {
            name: "budget",
            min_aliases: &["budgetMin", "minBudget"],
            max_aliases: &["budgetMax", "maxBudget"],
            shape: RangeShape::Overlap {
                min_column: "budget_min",
                max_column: "budget_max",
            },
            strict: true,
            min_window: Window::ANY,
            max_window: Window::ANY,
        }],
        search: None,
        sort: SortSpec::fixed(SortKey::desc("created_at")),
        activity: Activity::Active("is_active"),
        strict_paging: true,
    };

    fn run(
        schema: &EntitySchema,
        pairs: &[(&str, &str)],
    ) -> Result<(NormalizedFilter, Page), ValidationError> {
        let request = SearchRequest::from_pairs(pairs.iter().copied());
        normalize(&request, schema, &PageLimits::default())
    }

    fn issue_fields(err: &ValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn test_empty_request() {
        let (filter, page) = run(&LENIENT, &[]).unwrap();
        assert!(filter.is_empty());
        assert_eq!(page, Page { index: 1, size: 20 });
    }

    #[test]
    fn test_text_trimmed_and_aliased() {
        let (filter, _) = run(&LENIENT, &[("location", "  Austin ")]).unwrap();
        assert_eq!(filter.get("city"), Some(&FilterValue::Text("Austin".into())));
    }

    #[test]
    fn test_range_alias_precedence() {
        let (filter, _) = run(&LENIENT, &[("minBudget", "200"), ("budgetMin", "100")]).unwrap();
        assert_eq!(filter.range("rent").unwrap().min, Some(100.0));
    }

    #[test]
    fn test_lenient_range_windows() {
        let (filter, _) = run(&LENIENT, &[("minRent", "0"), ("maxRent", "2000000")]).unwrap();
        assert!(filter.range("rent").is_none());

        let (filter, _) = run(&LENIENT, &[("minRent", "abc"), ("maxRent", "1500.5")]).unwrap();
        assert_eq!(
            filter.range("rent"),
            Some(&RangeBounds {
                min: None,
                max: Some(1500.5)
            })
        );
    }

    #[test]
    fn test_lenient_inverted_range_dropped() {
        let (filter, _) = run(&LENIENT, &[("minRent", "900"), ("maxRent", "500")]).unwrap();
        assert!(filter.range("rent").is_none());
    }

    #[test]
    fn test_strict_inverted_range_rejected() {
        let err = run(&STRICT, &[("budgetMin", "900"), ("budgetMax", "500")]).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].code, "INVALID_RANGE");
        assert_eq!(err.issues[0].field, "query.budgetMin");
    }

    #[test]
    fn test_strict_errors_collected() {
        let err = run(
            &STRICT,
            &[
                ("budgetMin", "12.5"),
                ("maxBudget", "-3"),
                ("isActive", "yes"),
                ("status", "sleeping"),
                ("excludeId", "not-a-uuid"),
                ("page", "two"),
                ("limit", "10x"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            issue_fields(&err),
            vec![
                "query.isActive",
                "query.status",
                "query.excludeId",
                "query.budgetMin",
                "query.maxBudget",
                "query.page",
                "query.limit",
            ]
        );
    }

    #[test]
    fn test_strict_values_accepted() {
        let (filter, page) = run(
            &STRICT,
            &[
                ("isActive", "false"),
                ("status", "inactive"),
                ("excludeId", "6F9619FF-8B86-D011-B42D-00C04FC964FF"),
                ("budgetMin", "500"),
                ("page", "3"),
                ("limit", "80"),
            ],
        )
        .unwrap();
        assert_eq!(filter.get("isActive"), Some(&FilterValue::Bool(false)));
        assert_eq!(filter.get("status"), Some(&FilterValue::Enum("INACTIVE")));
        assert_eq!(
            filter.get("excludeId"),
            Some(&FilterValue::Id("6f9619ff-8b86-d011-b42d-00c04fc964ff".into()))
        );
        assert_eq!(filter.range("budget").unwrap().min, Some(500.0));
        assert_eq!(page, Page { index: 3, size: 50 });
    }

    #[test]
    fn test_lenient_boolean_three_valued() {
        let (filter, _) = run(&LENIENT, &[("isFlagged", "banana")]).unwrap();
        assert!(filter.get("isFlagged").is_none());
        let (filter, _) = run(&LENIENT, &[("isFlagged", "true")]).unwrap();
        assert_eq!(filter.get("isFlagged"), Some(&FilterValue::Bool(true)));
        // exact spelling only
        let (filter, _) = run(&LENIENT, &[("isFlagged", "TRUE")]).unwrap();
        assert!(filter.get("isFlagged").is_none());
    }

    #[test]
    fn test_enum_wildcard_and_unknown() {
        let (filter, _) = run(&LENIENT, &[("gender", "any")]).unwrap();
        assert!(filter.get("gender").is_none());
        let (filter, _) = run(&LENIENT, &[("gender", "robot")]).unwrap();
        assert!(filter.get("gender").is_none());
        let (filter, _) = run(&LENIENT, &[("gender", "female")]).unwrap();
        assert_eq!(filter.get("gender"), Some(&FilterValue::Enum("FEMALE")));
    }

    #[test]
    fn test_list_split_and_dedup() {
        let (filter, _) = run(
            &LENIENT,
            &[("amenities", "wifi, gym,,wifi"), ("amenities", "parking")],
        )
        .unwrap();
        assert_eq!(
            filter.get("amenities"),
            Some(&FilterValue::List(vec![
                "wifi".into(),
                "gym".into(),
                "parking".into()
            ]))
        );

        let (filter, _) = run(&LENIENT, &[("amenities", " , ")]).unwrap();
        assert!(filter.get("amenities").is_none());
    }

    #[test]
    fn test_dates() {
        let (filter, _) = run(&LENIENT, &[("availableFrom", "2024-06-01")]).unwrap();
        let Some(FilterValue::Date(d)) = filter.get("availableFrom") else {
            panic!("expected date");
        };
        assert_eq!(d.to_rfc3339(), "2024-06-01T00:00:00+00:00");

        let (filter, _) = run(&LENIENT, &[("availableFrom", "2024-06-01T12:00:00+02:00")]).unwrap();
        let Some(FilterValue::Date(d)) = filter.get("availableFrom") else {
            panic!("expected date");
        };
        assert_eq!(d.to_rfc3339(), "2024-06-01T10:00:00+00:00");

        let (filter, _) = run(&LENIENT, &[("availableFrom", "next tuesday")]).unwrap();
        assert!(filter.get("availableFrom").is_none());
    }

    #[test]
    fn test_lenient_number_window() {
        let (filter, _) = run(&LENIENT, &[("leaseLength", "0")]).unwrap();
        assert!(filter.get("leaseLength").is_none());
        let (filter, _) = run(&LENIENT, &[("leaseLength", "6")]).unwrap();
        assert_eq!(filter.get("leaseLength"), Some(&FilterValue::Number(6.0)));
        let (filter, _) = run(&LENIENT, &[("leaseLength", "NaN")]).unwrap();
        assert!(filter.get("leaseLength").is_none());
    }

    #[test]
    fn test_lenient_paging_falls_back() {
        let (_, page) = run(&LENIENT, &[("page", "x"), ("limit", "-5")]).unwrap();
        assert_eq!(page, Page { index: 1, size: 20 });
        let (_, page) = run(&LENIENT, &[("page", "0"), ("limit", "0")]).unwrap();
        assert_eq!(page, Page { index: 1, size: 1 });
        let (_, page) = run(&LENIENT, &[("page", "999"), ("limit", "20")]).unwrap();
        assert_eq!(page, Page { index: 999, size: 20 });
    }

    #[test]
    fn test_search_term() {
        let (filter, _) = run(&LENIENT, &[("search", "  Sunny ")]).unwrap();
        assert_eq!(filter.search.as_deref(), Some("Sunny"));
        let (filter, _) = run(&LENIENT, &[("search", "   ")]).unwrap();
        assert!(filter.search.is_none());
    }
}
