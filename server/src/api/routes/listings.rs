//! Listing search endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::SearchApiState;
use crate::api::auth::AuthUser;
use crate::api::extractors::{IdPath, SearchQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::types::ListingRow;
use crate::domain::search::SearchRequest;
use crate::domain::search::entities::{LISTINGS, OWNER_LISTINGS, listings_owned_by};

pub fn routes(state: SearchApiState) -> Router<()> {
    Router::new()
        .route("/search", get(search_listings))
        .route("/my-listings", get(my_listings))
        .route("/user/{id}", get(user_listings))
        .route("/{id}", get(get_listing))
        .with_state(state)
}

/// Search active listings
///
/// Unknown enum values, bad numbers and out-of-window values are ignored
/// rather than rejected on this surface.
#[utoipa::path(
    get,
    path = "/api/v1/listings/search",
    tag = "listings",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Text match on title, description or city"),
        ("city" = Option<String>, Query, description = "City substring, case-insensitive"),
        ("type" = Option<String>, Query, description = "HAVE_ROOM or NEED_ROOM"),
        ("furnishedStatus" = Option<String>, Query, description = "FULLY_FURNISHED, SEMI_FURNISHED or UNFURNISHED"),
        ("roomType" = Option<String>, Query, description = "Comma-separated APARTMENT, HOUSE, STUDIO, PRIVATE_ROOM, SHARED_ROOM or free-form room types; alias propertyType"),
        ("genderPreference" = Option<String>, Query, description = "MALE, FEMALE or ANY"),
        ("smokingAllowed" = Option<bool>, Query, description = "Smoking allowed"),
        ("petsAllowed" = Option<bool>, Query, description = "Pets allowed"),
        ("leaseLength" = Option<u32>, Query, description = "Maximum lease length in months"),
        ("amenities" = Option<String>, Query, description = "Comma-separated amenities, any match"),
        ("availableFrom" = Option<String>, Query, description = "Available on or before this date"),
        ("verifiedOnly" = Option<bool>, Query, description = "Only listings of phone-verified owners"),
        ("minRent" = Option<u32>, Query, description = "Minimum rent; aliases budgetMin, minBudget"),
        ("maxRent" = Option<u32>, Query, description = "Maximum rent; aliases budgetMax, maxBudget"),
        ("sortBy" = Option<String>, Query, description = "newest, price_low, price_high or popular")
    ),
    responses(
        (status = 200, description = "Page of listings with pagination metadata")
    )
)]
pub async fn search_listings(
    State(state): State<SearchApiState>,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<ListingRow>>, ApiError> {
    let search = state.compile(&request, &LISTINGS)?;
    let result = state
        .repository
        .search_listings(&search, false)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

/// Active listings owned by the caller
#[utoipa::path(
    get,
    path = "/api/v1/listings/my-listings",
    tag = "listings",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Page of the caller's listings"),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn my_listings(
    State(state): State<SearchApiState>,
    user: AuthUser,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<ListingRow>>, ApiError> {
    owned_listings(&state, &user.user_id, &request).await
}

/// Active listings of one owner
#[utoipa::path(
    get,
    path = "/api/v1/listings/user/{id}",
    tag = "listings",
    params(
        ("id" = String, Path, description = "Owner user ID (UUID)"),
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Page of the owner's listings"),
        (status = 400, description = "Invalid user ID", body = crate::api::types::ErrorBody)
    )
)]
pub async fn user_listings(
    State(state): State<SearchApiState>,
    path: IdPath,
    SearchQuery(request): SearchQuery,
) -> Result<Json<PaginatedResponse<ListingRow>>, ApiError> {
    owned_listings(&state, &path.id, &request).await
}

async fn owned_listings(
    state: &SearchApiState,
    owner_id: &str,
    request: &SearchRequest,
) -> Result<Json<PaginatedResponse<ListingRow>>, ApiError> {
    let search = state
        .compile(request, &OWNER_LISTINGS)?
        .restrict(listings_owned_by(owner_id));
    let result = state
        .repository
        .search_listings(&search, false)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(PaginatedResponse::new(result, &search.page)))
}

/// Get a single active listing by ID
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "listings",
    params(
        ("id" = String, Path, description = "Listing ID (UUID)")
    ),
    responses(
        (status = 200, description = "Listing details", body = ListingRow),
        (status = 400, description = "Invalid listing ID", body = crate::api::types::ErrorBody),
        (status = 404, description = "Listing not found", body = crate::api::types::ErrorBody)
    )
)]
pub async fn get_listing(
    State(state): State<SearchApiState>,
    path: IdPath,
) -> Result<Json<ListingRow>, ApiError> {
    let listing = state
        .repository
        .get_listing(&path.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("LISTING_NOT_FOUND", format!("Listing not found: {}", path.id))
        })?;

    Ok(Json(listing))
}
