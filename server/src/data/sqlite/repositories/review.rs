//! Review repository for SQLite operations

use sqlx::SqlitePool;

use super::query::{Source, fetch_page};
use crate::data::sqlite::SqliteError;
use crate::data::types::{PageResult, ReviewRow, ReviewerSummary};
use crate::domain::search::CompiledSearch;

const REVIEWS: Source = Source {
    from: "reviews rv JOIN users ru ON ru.id = rv.reviewer_id",
    alias: "rv",
    columns: r#"
        rv.id, rv.rating, rv.comment, rv.created_at,
        ru.id AS reviewer_id, ru.first_name AS reviewer_first_name,
        ru.last_name AS reviewer_last_name
    "#,
};

#[derive(sqlx::FromRow)]
struct ReviewRecord {
    id: String,
    rating: i64,
    comment: Option<String>,
    created_at: String,
    reviewer_id: String,
    reviewer_first_name: String,
    reviewer_last_name: String,
}

impl From<ReviewRecord> for ReviewRow {
    fn from(r: ReviewRecord) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            reviewer: ReviewerSummary {
                id: r.reviewer_id,
                first_name: r.reviewer_first_name,
                last_name: r.reviewer_last_name,
            },
        }
    }
}

/// Page of reviews matching a compiled search
pub async fn search_reviews(
    pool: &SqlitePool,
    search: &CompiledSearch,
) -> Result<PageResult<ReviewRow>, SqliteError> {
    let (records, total) = fetch_page::<ReviewRecord>(pool, &REVIEWS, search).await?;
    Ok(PageResult::new(
        records.into_iter().map(ReviewRow::from).collect(),
        total,
    ))
}
