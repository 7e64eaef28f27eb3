//! Test fixtures: in-memory database and row seeding

use sqlx::SqlitePool;

pub async fn setup_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    sqlx::query(crate::data::sqlite::schema::SCHEMA)
        .execute(&pool)
        .await
        .unwrap();
    pool
}

pub async fn exec(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql).execute(pool).await.unwrap();
}

pub async fn insert_user(pool: &SqlitePool, id: &str, first_name: &str, created_at: &str) {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, first_name, last_name, created_at)
        VALUES (?, ?, ?, 'Tester', ?)
        "#,
    )
    .bind(id)
    .bind(format!("{}@example.com", id))
    .bind(first_name)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_listing(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    title: &str,
    city: &str,
    rent: i64,
    created_at: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO listings (id, user_id, title, city, type, rent, created_at)
        VALUES (?, ?, ?, ?, 'HAVE_ROOM', ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(city)
    .bind(rent)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_team(
    pool: &SqlitePool,
    id: &str,
    creator_id: &str,
    name: &str,
    budget: (Option<i64>, Option<i64>),
    created_at: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO teams (id, creator_id, name, budget_min, budget_max, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(creator_id)
    .bind(name)
    .bind(budget.0)
    .bind(budget.1)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_member(pool: &SqlitePool, team_id: &str, user_id: &str, status: &str) {
    sqlx::query(
        r#"
        INSERT INTO team_members (team_id, user_id, status, created_at)
        VALUES (?, ?, ?, '2025-01-01T00:00:00Z')
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_review(
    pool: &SqlitePool,
    id: &str,
    reviewer_id: &str,
    reviewee_id: &str,
    rating: i64,
    hidden: bool,
) {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, reviewer_id, reviewee_id, rating, is_hidden, created_at)
        VALUES (?, ?, ?, ?, ?, '2025-01-01T00:00:00Z')
        "#,
    )
    .bind(id)
    .bind(reviewer_id)
    .bind(reviewee_id)
    .bind(rating)
    .bind(hidden)
    .execute(pool)
    .await
    .unwrap();
}
