//! Search result rows
//!
//! Serialized as-is into API responses, so field names follow the public
//! camelCase contract.

use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Paging
// ============================================================================

/// One page of rows plus the total match count
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

// ============================================================================
// Listing types
// ============================================================================

/// Public summary of a listing's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_verified: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    #[serde(rename = "type")]
    pub listing_type: String,
    pub property_type: Option<String>,
    pub room_type: Option<String>,
    pub furnished_status: Option<String>,
    pub gender_preference: Option<String>,
    pub smoking_allowed: bool,
    pub pets_allowed: bool,
    pub rent: i64,
    pub lease_length: Option<i64>,
    pub amenities: Vec<String>,
    pub available_from: Option<String>,
    pub view_count: i64,
    pub is_active: bool,
    /// Moderation state, only exposed on admin surfaces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_flagged: Option<bool>,
    pub created_at: String,
    pub owner: OwnerSummary,
}

// ============================================================================
// User types
// ============================================================================

/// Public user profile with review aggregate
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub occupation: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub cleanliness: Option<String>,
    pub smoking_preference: Option<String>,
    pub drinking_preference: Option<String>,
    pub pets_preference: Option<String>,
    pub sleep_schedule: Option<String>,
    pub phone_verified: bool,
    pub created_at: String,
    /// Mean of visible received ratings, one decimal, 0 when none
    pub average_rating: f64,
    pub review_count: i64,
}

/// User as seen by administrators
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: String,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub is_active: bool,
    pub is_banned: bool,
    pub suspended_until: Option<String>,
    pub created_at: String,
}

// ============================================================================
// Team types
// ============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    pub id: String,
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub max_members: i64,
    pub is_active: bool,
    pub created_at: String,
    /// Accepted members only
    pub member_count: i64,
}

// ============================================================================
// Review types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRow {
    pub id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
    pub reviewer: ReviewerSummary,
}
