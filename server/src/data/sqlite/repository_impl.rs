//! SearchRepository trait implementation for SQLite

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::SearchRepository;
use crate::data::types::{AdminUserRow, ListingRow, PageResult, ReviewRow, TeamRow, UserRow};
use crate::domain::search::CompiledSearch;

use super::SqliteService;
use super::repositories::{listing, review, team, user};

#[async_trait]
impl SearchRepository for Arc<SqliteService> {
    // ==================== Listing Operations ====================

    async fn search_listings(
        &self,
        search: &CompiledSearch,
        with_moderation: bool,
    ) -> Result<PageResult<ListingRow>, DataError> {
        listing::search_listings(self.pool(), search, with_moderation)
            .await
            .map_err(Into::into)
    }

    async fn get_listing(&self, id: &str) -> Result<Option<ListingRow>, DataError> {
        listing::get_active_listing(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== User Operations ====================

    async fn search_users(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<UserRow>, DataError> {
        user::search_users(self.pool(), search)
            .await
            .map_err(Into::into)
    }

    async fn search_admin_users(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<AdminUserRow>, DataError> {
        user::search_admin_users(self.pool(), search)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_active_user(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Team Operations ====================

    async fn search_teams(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<TeamRow>, DataError> {
        team::search_teams(self.pool(), search)
            .await
            .map_err(Into::into)
    }

    async fn get_team(&self, id: &str) -> Result<Option<TeamRow>, DataError> {
        team::get_team(self.pool(), id).await.map_err(Into::into)
    }

    // ==================== Review Operations ====================

    async fn search_reviews(
        &self,
        search: &CompiledSearch,
    ) -> Result<PageResult<ReviewRow>, DataError> {
        review::search_reviews(self.pool(), search)
            .await
            .map_err(Into::into)
    }

    // ==================== Health ====================

    async fn ping(&self) -> Result<(), DataError> {
        SqliteService::ping(self).await.map_err(Into::into)
    }
}
