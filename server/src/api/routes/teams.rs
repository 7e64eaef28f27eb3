//! Team search endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::SearchApiState;
use crate::api::auth::AuthUser;
use crate::api::extractors::{IdPath, SearchQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::types::TeamRow;
use crate::domain::search::entities::{MEMBER_TEAMS, TEAMS, teams_joined_by};

pub fn routes(state: SearchApiState) -> Router<()> {
    Router::new()
        .route("/", get(search_teams))
        .route("/my-teams", get(my_teams))
        .route("/{id}", get(get_team))
        .with_state(state)
}

/// Search teams; only active teams unless `isActive=false`
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "teams",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("city" = Option<String>, Query, description = "City substring, case-insensitive"),
        ("budgetMin" = Option<u32>, Query, description = "Budget window lower bound"),
        ("budgetMax" = Option<u32>, Query, description = "Budget window upper bound"),
        ("isActive" = Option<bool>, Query, description = "Active state, default true")
    ),
    responses(
        (status = 200, description = "Page of teams with pagination metadata"),
        (status = 400, description = "Invalid filter", body = crate::api::types::ErrorBody)
    )
)]
pub async fn search_teams(
    State(state): State<SearchApiState>,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<TeamRow>>, ApiError> {
    let search = state.compile(&request, &TEAMS)?;
    let result = state
        .repository
        .search_teams(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

/// Teams the caller created or joined
#[utoipa::path(
    get,
    path = "/api/v1/teams/my-teams",
    tag = "teams",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Page of the caller's teams"),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn my_teams(
    State(state): State<SearchApiState>,
    user: AuthUser,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<TeamRow>>, ApiError> {
    let search = state
        .compile(&request, &MEMBER_TEAMS)?
        .restrict(teams_joined_by(&user.user_id));
    let result = state
        .repository
        .search_teams(&search)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

/// Get a single team by ID
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    tag = "teams",
    params(
        ("id" = String, Path, description = "Team ID (UUID)")
    ),
    responses(
        (status = 200, description = "Team details", body = TeamRow),
        (status = 400, description = "Invalid team ID", body = crate::api::types::ErrorBody),
        (status = 404, description = "Team not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_team(
    State(state): State<SearchApiState>,
    path: IdPath,
) -> Result<Json<TeamRow>, ApiError> {
    let team = state
        .repository
        .get_team(&path.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("TEAM_NOT_FOUND", format!("Team not found: {}", path.id)))?;

    Ok(Json(team))
}
