//! Sort Selector

use serde::Serialize;

use super::params::SearchRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse `asc` / `desc` case-insensitively
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Single ordering column with direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: Direction,
}

impl SortKey {
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }

    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }
}

/// One accepted `sortBy` value
#[derive(Debug)]
pub struct SortOption {
    pub value: &'static str,
    pub key: SortKey,
}

/// Sort declaration of a surface
#[derive(Debug)]
pub struct SortSpec {
    pub param: &'static str,
    /// Optional `asc|desc` override parameter
    pub order_param: Option<&'static str>,
    pub options: &'static [SortOption],
    pub default: SortKey,
}

impl SortSpec {
    /// Fixed ordering; `sortBy` is ignored
    pub const fn fixed(default: SortKey) -> Self {
        Self {
            param: "sortBy",
            order_param: None,
            options: &[],
            default,
        }
    }

    /// Resolve the ordering for a request. Never fails: unknown values fall back to the default.
    pub fn select(&self, request: &SearchRequest) -> SortKey {
        let sort_by = request.first(&[self.param]).map(|(_, v)| v);
        self.select_values(sort_by, self.order_value(request))
    }

    pub fn select_values(&self, sort_by: Option<&str>, sort_order: Option<&str>) -> SortKey {
        let mut key = sort_by
            .and_then(|raw| {
                self.options
                    .iter()
                    .find(|o| o.value.eq_ignore_ascii_case(raw.trim()))
            })
            .map(|o| o.key)
            .unwrap_or(self.default);

        if self.order_param.is_some()
            && let Some(direction) = sort_order.and_then(Direction::parse)
        {
            key.direction = direction;
        }
        key
    }

    fn order_value<'a>(&self, request: &'a SearchRequest) -> Option<&'a str> {
        let param = self.order_param?;
        request.first(&[param]).map(|(_, v)| v)
    }
}
