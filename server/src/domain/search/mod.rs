//! Filter-to-query compiler
//!
//! Pipeline for one search call:
//!
//! - `params` - raw query-string multimap
//! - `normalize` - Stage 1: typed, validated filter + page
//! - `predicate` - Stage 2: backend-agnostic predicate tree
//! - `sort` - Stage 3: single ordering key
//! - `page` - Stage 4: offset/limit arithmetic
//! - `compile` - Pipeline orchestrator
//!
//! Field schemas for each surface live in `entities`.

mod compile;
mod error;
mod normalize;
mod page;
mod params;
mod predicate;
mod schema;
mod sort;

pub mod entities;

pub use compile::{CompiledSearch, compile};
pub use error::{ValidationError, ValidationIssue};
pub use normalize::{FilterValue, NormalizedFilter, RangeBounds};
pub use page::{Page, PageLimits};
pub use params::SearchRequest;
pub use predicate::{BuildContext, Predicate, Value};
pub use schema::{EntitySchema, Relation};
pub use sort::{Direction, SortKey};
