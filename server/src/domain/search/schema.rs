//! Field schema types
//!
//! Each searchable surface declares its parameters once, statically: kind,
//! aliases in priority order, strictness, and how a normalized value turns
//! into predicates. Column names only ever come from these declarations.

use super::normalize::FilterValue;
use super::predicate::{BuildContext, Predicate};
use super::sort::SortSpec;

/// Parameter kind, driving how raw strings are parsed
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Number,
    /// `"true"` / `"false"`; anything else is unset
    Boolean,
    Enum(&'static EnumSpec),
    /// Trimmed free text
    Text,
    /// Comma-split or repeated, trimmed, deduplicated
    TextList,
    /// RFC 3339 date-time or `YYYY-MM-DD`
    Date,
    Uuid,
}

/// Accepted values of an enum parameter
#[derive(Debug)]
pub struct EnumSpec {
    /// Canonical upper-case values
    pub values: &'static [&'static str],
    /// Value that is accepted but applies no filter
    pub wildcard: Option<&'static str>,
    /// Legacy spellings mapped to canonical values (matched case-insensitively)
    pub aliases: &'static [(&'static str, &'static str)],
}

impl EnumSpec {
    /// Canonical form of a raw value, or None if unknown
    pub fn canonical(&self, raw: &str) -> Option<&'static str> {
        let raw = raw.trim();
        if let Some((_, canonical)) = self
            .aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(raw))
        {
            return Some(canonical);
        }
        let upper = raw.to_ascii_uppercase();
        self.values.iter().copied().find(|v| *v == upper)
    }

    pub fn is_wildcard(&self, canonical: &str) -> bool {
        self.wildcard == Some(canonical)
    }

    /// Comma-separated list for error messages
    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Acceptance window for lenient numeric values (both bounds exclusive)
#[derive(Debug, Clone, Copy, Default)]
pub struct Window {
    pub above: Option<f64>,
    pub below: Option<f64>,
}

impl Window {
    pub const ANY: Window = Window {
        above: None,
        below: None,
    };

    pub const POSITIVE: Window = Window {
        above: Some(0.0),
        below: None,
    };

    pub fn contains(&self, value: f64) -> bool {
        self.above.is_none_or(|a| value > a) && self.below.is_none_or(|b| value < b)
    }
}

/// One-hop relation from the searched entity to another table
#[derive(Debug, PartialEq, Eq)]
pub struct Relation {
    pub table: &'static str,
    /// Column on the searched entity referencing `table`
    pub foreign_key: &'static str,
    /// Referenced column on `table`
    pub primary_key: &'static str,
}

/// How a normalized field value becomes a predicate
#[derive(Clone, Copy)]
pub enum Target {
    /// `column = value`
    Eq(&'static str),
    /// `column <> value`
    NotEq(&'static str),
    /// Case-insensitive substring on one column
    Contains(&'static str),
    /// OR of substring matches, one per list element, on one column
    ContainsAny(&'static str),
    /// JSON array column shares at least one element with the list
    Intersects(&'static str),
    /// `column >= value`
    AtLeast(&'static str),
    /// `column <= value`
    AtMost(&'static str),
    /// Overrides the value of the base activity predicate
    Activity,
    /// Entity-specific composite predicate
    Build(fn(&FilterValue, &BuildContext) -> Option<Predicate>),
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq(c) => write!(f, "Eq({})", c),
            Self::NotEq(c) => write!(f, "NotEq({})", c),
            Self::Contains(c) => write!(f, "Contains({})", c),
            Self::ContainsAny(c) => write!(f, "ContainsAny({})", c),
            Self::Intersects(c) => write!(f, "Intersects({})", c),
            Self::AtLeast(c) => write!(f, "AtLeast({})", c),
            Self::AtMost(c) => write!(f, "AtMost({})", c),
            Self::Activity => write!(f, "Activity"),
            Self::Build(_) => write!(f, "Build(..)"),
        }
    }
}

/// A single (non-range) searchable parameter
#[derive(Debug)]
pub struct FieldSpec {
    /// Canonical name, also the key in the normalized filter
    pub name: &'static str,
    /// Accepted parameter names in priority order
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    /// Malformed values are reported instead of dropped
    pub strict: bool,
    /// Lenient numeric values outside the window are dropped
    pub window: Window,
    pub target: Target,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, target: Target) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            strict: false,
            window: Window::ANY,
            target,
        }
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub const fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Parameter names to look up; the canonical name alone when no aliases are declared
    pub fn param_names(&self) -> &[&'static str] {
        if self.aliases.is_empty() {
            std::slice::from_ref(&self.name)
        } else {
            self.aliases
        }
    }
}

/// Shape of the entity side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeShape {
    /// Single column: `col >= min AND col <= max`
    Scalar(&'static str),
    /// Entity stores its own interval: `max_col >= min AND min_col <= max`
    Overlap {
        min_column: &'static str,
        max_column: &'static str,
    },
}

/// A min/max parameter pair
#[derive(Debug)]
pub struct RangeSpec {
    pub name: &'static str,
    pub min_aliases: &'static [&'static str],
    pub max_aliases: &'static [&'static str],
    pub shape: RangeShape,
    /// Strict ranges reject non-digit bounds and `min > max`
    pub strict: bool,
    pub min_window: Window,
    pub max_window: Window,
}

/// Free-text `search` expansion
#[derive(Debug)]
pub struct TextSearch {
    pub param: &'static str,
    pub columns: &'static [&'static str],
}

/// Base predicate applied to every query on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// `column = true` unless a field with `Target::Activity` overrides the value
    Active(&'static str),
    /// No base restriction (admin surfaces)
    Unrestricted,
}

/// Complete static schema of one search surface
#[derive(Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub ranges: &'static [RangeSpec],
    pub search: Option<TextSearch>,
    pub sort: SortSpec,
    pub activity: Activity,
    /// Non-digit `page` / `limit` are reported instead of defaulted
    pub strict_paging: bool,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
