//! Repository traits for database backends
//!
//! Handlers depend on `SearchRepository` only; the SQLite service implements it.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{AdminUserRow, ListingRow, PageResult, ReviewRow, TeamRow, UserRow};
use crate::domain::search::CompiledSearch;

/// Read-side operations behind every search surface
#[async_trait]
pub trait SearchRepository: Send + Sync {
    // ==================== Listing Operations ====================

    /// Page of listings; `with_moderation` exposes the flagged state
    async fn search_listings(
        &self,
        search: &CompiledSearch,
        with_moderation: bool,
    ) -> Result<PageResult<ListingRow>, DataError>;

    /// Active listing by ID
    async fn get_listing(&self, id: &str) -> Result<Option<ListingRow>, DataError>;

    // ==================== User Operations ====================

    async fn search_users(&self, search: &CompiledSearch)
    -> Result<PageResult<UserRow>, DataError>;

    async fn search_admin_users(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<AdminUserRow>, DataError>;

    /// Active user profile by ID
    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    // ==================== Team Operations ====================

    async fn search_teams(&self, search: &CompiledSearch)
    -> Result<PageResult<TeamRow>, DataError>;

    async fn get_team(&self, id: &str) -> Result<Option<TeamRow>, DataError>;

    // ==================== Review Operations ====================

    async fn search_reviews(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<ReviewRow>, DataError>;

    // ==================== Health ====================

    async fn ping(&self) -> Result<(), DataError>;
}
