//! Roommate search and profile endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::SearchApiState;
use crate::api::extractors::{IdPath, SearchQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::types::{ReviewRow, UserRow};
use crate::domain::search::entities::{USER_REVIEWS, USERS, visible_reviews_of};

pub fn routes(state: SearchApiState) -> Router<()> {
    Router::new()
        .route("/", get(search_users))
        .route("/{id}", get(get_user))
        .route("/{id}/reviews", get(user_reviews))
        .with_state(state)
}

/// Search active roommate profiles
///
/// Malformed numbers, inverted ranges and a malformed `excludeId` are
/// rejected with `VALIDATION_FAILED`. Unknown enum values are ignored.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("gender" = Option<String>, Query, description = "MALE, FEMALE, NON_BINARY or PREFER_NOT_TO_SAY"),
        ("city" = Option<String>, Query, description = "City substring; alias location"),
        ("occupation" = Option<String>, Query, description = "Comma-separated occupation substrings, any match"),
        ("cleanliness" = Option<String>, Query, description = "VERY_CLEAN, MODERATELY_CLEAN or RELAXED"),
        ("smokingPreference" = Option<String>, Query, description = "YES, NO or OCCASIONALLY; alias smoking"),
        ("drinkingPreference" = Option<String>, Query, description = "YES, NO, OCCASIONALLY or SOCIALLY"),
        ("petsPreference" = Option<String>, Query, description = "HAS_PETS, NO_PETS or OPEN_TO_PETS; alias pets"),
        ("sleepSchedule" = Option<String>, Query, description = "EARLY_BIRD, NIGHT_OWL or FLEXIBLE"),
        ("verifiedOnly" = Option<bool>, Query, description = "Only phone-verified users"),
        ("excludeId" = Option<String>, Query, description = "User ID (UUID) to leave out"),
        ("budgetMin" = Option<u32>, Query, description = "Budget window lower bound"),
        ("budgetMax" = Option<u32>, Query, description = "Budget window upper bound"),
        ("ageMin" = Option<u32>, Query, description = "Minimum age"),
        ("ageMax" = Option<u32>, Query, description = "Maximum age")
    ),
    responses(
        (status = 200, description = "Page of users with pagination metadata"),
        (status = 400, description = "Invalid filter", body = crate::api::types::ErrorBody)
    )
)]
pub async fn search_users(
    State(state): State<SearchApiState>,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<UserRow>>, ApiError> {
    let search = state.compile(&request, &USERS)?;
    let result = state
        .repository
        .search_users(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

/// Get an active user's public profile
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User profile", body = UserRow),
        (status = 400, description = "Invalid user ID", body = crate::api::types::ErrorBody),
        (status = 404, description = "User not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<SearchApiState>,
    path: IdPath,
) -> Result<Json<UserRow>, ApiError> {
    let user = state
        .repository
        .get_user(&path.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", format!("User not found: {}", path.id)))?;

    Ok(Json(user))
}

/// Visible reviews received by a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/reviews",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID (UUID)"),
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Page of reviews with pagination metadata"),
        (status = 400, description = "Invalid user ID or paging", body = crate::api::types::ErrorBody)
    )
)]
pub async fn user_reviews(
    State(state): State<SearchApiState>,
    path: IdPath,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<ReviewRow>>, ApiError> {
    let search = state
        .compile(&request, &USER_REVIEWS)?
        .restrict(visible_reviews_of(&path.id));
    let result = state
        .repository
        .search_reviews(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}
