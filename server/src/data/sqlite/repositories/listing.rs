//! Listing repository for SQLite operations

use sqlx::SqlitePool;

use super::query::{Source, fetch_one, fetch_page};
use crate::data::sqlite::SqliteError;
use crate::data::types::{ListingRow, OwnerSummary, PageResult};
use crate::domain::search::{CompiledSearch, Predicate};

const LISTINGS: Source = Source {
    from: "listings l JOIN users o ON o.id = l.user_id",
    alias: "l",
    columns: r#"
        l.id, l.title, l.description, l.city, l.type AS listing_type,
        l.property_type, l.room_type, l.furnished_status, l.gender_preference,
        l.smoking_allowed, l.pets_allowed, l.rent, l.lease_length, l.amenities,
        l.available_from, l.view_count, l.is_active, l.is_flagged, l.created_at,
        o.id AS owner_id, o.first_name AS owner_first_name,
        o.last_name AS owner_last_name, o.phone_verified AS owner_phone_verified
    "#,
};

#[derive(sqlx::FromRow)]
struct ListingRecord {
    id: String,
    title: String,
    description: String,
    city: String,
    listing_type: String,
    property_type: Option<String>,
    room_type: Option<String>,
    furnished_status: Option<String>,
    gender_preference: Option<String>,
    smoking_allowed: bool,
    pets_allowed: bool,
    rent: i64,
    lease_length: Option<i64>,
    amenities: String,
    available_from: Option<String>,
    view_count: i64,
    is_active: bool,
    is_flagged: bool,
    created_at: String,
    owner_id: String,
    owner_first_name: String,
    owner_last_name: String,
    owner_phone_verified: bool,
}

impl ListingRecord {
    fn into_row(self, with_moderation: bool) -> Result<ListingRow, SqliteError> {
        let amenities: Vec<String> =
            serde_json::from_str(&self.amenities).map_err(|e| SqliteError::Corrupt {
                column: "amenities",
                reason: e.to_string(),
            })?;
        Ok(ListingRow {
            id: self.id,
            title: self.title,
            description: self.description,
            city: self.city,
            listing_type: self.listing_type,
            property_type: self.property_type,
            room_type: self.room_type,
            furnished_status: self.furnished_status,
            gender_preference: self.gender_preference,
            smoking_allowed: self.smoking_allowed,
            pets_allowed: self.pets_allowed,
            rent: self.rent,
            lease_length: self.lease_length,
            amenities,
            available_from: self.available_from,
            view_count: self.view_count,
            is_active: self.is_active,
            is_flagged: with_moderation.then_some(self.is_flagged),
            created_at: self.created_at,
            owner: OwnerSummary {
                id: self.owner_id,
                first_name: self.owner_first_name,
                last_name: self.owner_last_name,
                phone_verified: self.owner_phone_verified,
            },
        })
    }
}

/// Page of listings matching a compiled search
///
/// `with_moderation` exposes the flagged state (admin surfaces).
pub async fn search_listings(
    pool: &SqlitePool,
    search: &CompiledSearch,
    with_moderation: bool,
) -> Result<PageResult<ListingRow>, SqliteError> {
    let (records, total) = fetch_page::<ListingRecord>(pool, &LISTINGS, search).await?;
    let items = records
        .into_iter()
        .map(|r| r.into_row(with_moderation))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PageResult::new(items, total))
}

/// Get an active listing by ID
pub async fn get_active_listing(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ListingRow>, SqliteError> {
    let predicate = Predicate::and(vec![
        Predicate::eq("id", id),
        Predicate::eq("is_active", true),
    ]);
    fetch_one::<ListingRecord>(pool, &LISTINGS, &predicate)
        .await?
        .map(|r| r.into_row(false))
        .transpose()
}
