//! Administrator search endpoints
//!
//! Every handler requires an [`AdminUser`]. Inactive, banned and flagged
//! records stay visible here unless a `status` filter narrows them.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::SearchApiState;
use crate::api::auth::AdminUser;
use crate::api::extractors::SearchQuery;
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::types::{AdminUserRow, ListingRow, TeamRow};
use crate::domain::search::entities::{ADMIN_LISTINGS, ADMIN_TEAMS, ADMIN_USERS};

pub fn routes(state: SearchApiState) -> Router<()> {
    Router::new()
        .route("/users", get(search_users))
        .route("/listings", get(search_listings))
        .route("/teams", get(search_teams))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Text match on email, name or phone"),
        ("status" = Option<String>, Query, description = "ACTIVE, BANNED, SUSPENDED or INACTIVE; other values are ignored"),
        ("emailVerified" = Option<bool>, Query, description = "Email verified"),
        ("phoneVerified" = Option<bool>, Query, description = "Phone verified"),
        ("gender" = Option<String>, Query, description = "MALE, FEMALE, NON_BINARY or PREFER_NOT_TO_SAY"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("sortBy" = Option<String>, Query, description = "joinDate or name"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "Page of users with pagination metadata"),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::api::types::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn search_users(
    State(state): State<SearchApiState>,
    admin: AdminUser,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<AdminUserRow>>, ApiError> {
    tracing::debug!(admin_id = %admin.user_id, "Admin user search");
    let search = state.compile(&request, &ADMIN_USERS)?;
    let result = state
        .repository
        .search_admin_users(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/listings",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Text match on title, description or city"),
        ("type" = Option<String>, Query, description = "HAVE_ROOM or NEED_ROOM"),
        ("status" = Option<String>, Query, description = "ACTIVE or INACTIVE; other values are ignored"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("isFlagged" = Option<bool>, Query, description = "Flagged for moderation"),
        ("minRent" = Option<u32>, Query, description = "Minimum rent"),
        ("maxRent" = Option<u32>, Query, description = "Maximum rent")
    ),
    responses(
        (status = 200, description = "Page of listings with moderation state"),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::api::types::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn search_listings(
    State(state): State<SearchApiState>,
    admin: AdminUser,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<ListingRow>>, ApiError> {
    tracing::debug!(admin_id = %admin.user_id, "Admin listing search");
    let search = state.compile(&request, &ADMIN_LISTINGS)?;
    let result = state
        .repository
        .search_listings(&search, true)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/teams",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Text match on team name"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("status" = Option<String>, Query, description = "ACTIVE or INACTIVE; other values are ignored")
    ),
    responses(
        (status = 200, description = "Page of teams with pagination metadata"),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::api::types::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn search_teams(
    State(state): State<SearchApiState>,
    admin: AdminUser,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<TeamRow>>, ApiError> {
    tracing::debug!(admin_id = %admin.user_id, "Admin team search");
    let search = state.compile(&request, &ADMIN_TEAMS)?;
    let result = state
        .repository
        .search_teams(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}
