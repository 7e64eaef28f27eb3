//! Domain logic for roommate search
//!
//! - `search` - Search parameter normalization and predicate compilation

pub mod search;

pub use search::{BuildContext, CompiledSearch, SearchRequest, ValidationError};
