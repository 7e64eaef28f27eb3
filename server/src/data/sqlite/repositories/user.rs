//! User repository for SQLite operations

use sqlx::SqlitePool;

use super::query::{Source, fetch_one, fetch_page};
use crate::data::sqlite::SqliteError;
use crate::data::types::{AdminUserRow, PageResult, UserRow};
use crate::domain::search::{CompiledSearch, Predicate};

const USERS: Source = Source {
    from: "users u",
    alias: "u",
    columns: r#"
        u.id, u.first_name, u.last_name, u.age, u.gender, u.city, u.bio, u.occupation,
        u.budget_min, u.budget_max, u.cleanliness, u.smoking_preference,
        u.drinking_preference, u.pets_preference, u.sleep_schedule, u.phone_verified,
        u.created_at,
        (SELECT COALESCE(ROUND(AVG(rv.rating), 1), 0.0) FROM reviews rv
          WHERE rv.reviewee_id = u.id AND rv.is_hidden = 0) AS average_rating,
        (SELECT COUNT(*) FROM reviews rv
          WHERE rv.reviewee_id = u.id AND rv.is_hidden = 0) AS review_count
    "#,
};

const ADMIN_USERS: Source = Source {
    from: "users u",
    alias: "u",
    columns: r#"
        u.id, u.email, u.phone, u.first_name, u.last_name, u.gender, u.city,
        u.email_verified, u.phone_verified, u.is_active, u.is_banned,
        u.suspended_until, u.created_at
    "#,
};

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: String,
    first_name: String,
    last_name: String,
    age: Option<i64>,
    gender: Option<String>,
    city: Option<String>,
    bio: Option<String>,
    occupation: Option<String>,
    budget_min: Option<i64>,
    budget_max: Option<i64>,
    cleanliness: Option<String>,
    smoking_preference: Option<String>,
    drinking_preference: Option<String>,
    pets_preference: Option<String>,
    sleep_schedule: Option<String>,
    phone_verified: bool,
    created_at: String,
    average_rating: f64,
    review_count: i64,
}

impl From<UserRecord> for UserRow {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            age: r.age,
            gender: r.gender,
            city: r.city,
            bio: r.bio,
            occupation: r.occupation,
            budget_min: r.budget_min,
            budget_max: r.budget_max,
            cleanliness: r.cleanliness,
            smoking_preference: r.smoking_preference,
            drinking_preference: r.drinking_preference,
            pets_preference: r.pets_preference,
            sleep_schedule: r.sleep_schedule,
            phone_verified: r.phone_verified,
            created_at: r.created_at,
            average_rating: r.average_rating,
            review_count: r.review_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AdminUserRecord {
    id: String,
    email: String,
    phone: Option<String>,
    first_name: String,
    last_name: String,
    gender: Option<String>,
    city: Option<String>,
    email_verified: bool,
    phone_verified: bool,
    is_active: bool,
    is_banned: bool,
    suspended_until: Option<String>,
    created_at: String,
}

impl From<AdminUserRecord> for AdminUserRow {
    fn from(r: AdminUserRecord) -> Self {
        Self {
            id: r.id,
            email: r.email,
            phone: r.phone,
            first_name: r.first_name,
            last_name: r.last_name,
            gender: r.gender,
            city: r.city,
            email_verified: r.email_verified,
            phone_verified: r.phone_verified,
            is_active: r.is_active,
            is_banned: r.is_banned,
            suspended_until: r.suspended_until,
            created_at: r.created_at,
        }
    }
}

/// Page of public user profiles matching a compiled search
pub async fn search_users(
    pool: &SqlitePool,
    search: &CompiledSearch,
) -> Result<PageResult<UserRow>, SqliteError> {
    let (records, total) = fetch_page::<UserRecord>(pool, &USERS, search).await?;
    Ok(PageResult::new(
        records.into_iter().map(UserRow::from).collect(),
        total,
    ))
}

/// Page of users for administrators
pub async fn search_admin_users(
    pool: &SqlitePool,
    search: &CompiledSearch,
) -> Result<PageResult<AdminUserRow>, SqliteError> {
    let (records, total) = fetch_page::<AdminUserRecord>(pool, &ADMIN_USERS, search).await?;
    Ok(PageResult::new(
        records.into_iter().map(AdminUserRow::from).collect(),
        total,
    ))
}

/// Get an active user's public profile by ID
pub async fn get_active_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let predicate = Predicate::and(vec![
        Predicate::eq("id", id),
        Predicate::eq("is_active", true),
    ]);
    Ok(fetch_one::<UserRecord>(pool, &USERS, &predicate)
        .await?
        .map(UserRow::from))
}
