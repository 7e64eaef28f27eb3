//! Search compilation pipeline

use super::error::ValidationError;
use super::normalize::normalize;
use super::page::{Page, PageLimits};
use super::params::SearchRequest;
use super::predicate::{BuildContext, Predicate, build};
use super::schema::EntitySchema;
use super::sort::SortKey;

/// Query-language independent description of one search call
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSearch {
    pub predicate: Predicate,
    pub sort: SortKey,
    pub page: Page,
}

impl CompiledSearch {
    /// Add a conjunct ahead of the request-derived filters
    pub fn restrict(mut self, predicate: Predicate) -> Self {
        self.predicate = match self.predicate {
            Predicate::And(mut parts) => {
                parts.insert(0, predicate);
                Predicate::And(parts)
            }
            other => Predicate::and(vec![predicate, other]),
        };
        self
    }
}

/// Normalize, build, sort and page one request against a surface
pub fn compile(
    request: &SearchRequest,
    schema: &EntitySchema,
    limits: &PageLimits,
    ctx: &BuildContext,
) -> Result<CompiledSearch, ValidationError> {
    let (filter, page) = normalize(request, schema, limits)?;
    let predicate = build(&filter, schema, ctx);
    let sort = filter.sort.unwrap_or(schema.sort.default);
    Ok(CompiledSearch {
        predicate,
        sort,
        page,
    })
}
