//! API route handlers

pub mod admin;
pub mod health;
pub mod listings;
pub mod teams;
pub mod users;

use std::sync::Arc;

use crate::api::types::ApiError;
use crate::data::SearchRepository;
use crate::domain::search::{
    BuildContext, CompiledSearch, EntitySchema, PageLimits, SearchRequest, compile,
};

/// Shared state for every search surface
#[derive(Clone)]
pub struct SearchApiState {
    pub repository: Arc<dyn SearchRepository>,
    pub limits: PageLimits,
}

impl SearchApiState {
    pub fn new(repository: Arc<dyn SearchRepository>, limits: PageLimits) -> Self {
        Self { repository, limits }
    }

    /// Compile a raw query against one surface, evaluated at the current time
    pub(crate) fn compile(
        &self,
        request: &SearchRequest,
        schema: &EntitySchema,
    ) -> Result<CompiledSearch, ApiError> {
        Ok(compile(
            request,
            schema,
            &self.limits,
            &BuildContext::now(),
        )?)
    }
}
