//! Team repository for SQLite operations

use sqlx::SqlitePool;

use super::query::{Source, fetch_one, fetch_page};
use crate::data::sqlite::SqliteError;
use crate::data::types::{PageResult, TeamRow};
use crate::domain::search::{CompiledSearch, Predicate};

const TEAMS: Source = Source {
    from: "teams t",
    alias: "t",
    columns: r#"
        t.id, t.creator_id, t.name, t.description, t.city, t.budget_min, t.budget_max,
        t.max_members, t.is_active, t.created_at,
        (SELECT COUNT(*) FROM team_members tm
          WHERE tm.team_id = t.id AND tm.status = 'ACCEPTED') AS member_count
    "#,
};

#[derive(sqlx::FromRow)]
struct TeamRecord {
    id: String,
    creator_id: String,
    name: String,
    description: Option<String>,
    city: Option<String>,
    budget_min: Option<i64>,
    budget_max: Option<i64>,
    max_members: i64,
    is_active: bool,
    created_at: String,
    member_count: i64,
}

impl From<TeamRecord> for TeamRow {
    fn from(r: TeamRecord) -> Self {
        Self {
            id: r.id,
            creator_id: r.creator_id,
            name: r.name,
            description: r.description,
            city: r.city,
            budget_min: r.budget_min,
            budget_max: r.budget_max,
            max_members: r.max_members,
            is_active: r.is_active,
            created_at: r.created_at,
            member_count: r.member_count,
        }
    }
}

/// Page of teams matching a compiled search
pub async fn search_teams(
    pool: &SqlitePool,
    search: &CompiledSearch,
) -> Result<PageResult<TeamRow>, SqliteError> {
    let (records, total) = fetch_page::<TeamRecord>(pool, &TEAMS, search).await?;
    Ok(PageResult::new(
        records.into_iter().map(TeamRow::from).collect(),
        total,
    ))
}

/// Get a team by ID regardless of its active flag
pub async fn get_team(pool: &SqlitePool, id: &str) -> Result<Option<TeamRow>, SqliteError> {
    Ok(
        fetch_one::<TeamRecord>(pool, &TEAMS, &Predicate::eq("id", id))
            .await?
            .map(TeamRow::from),
    )
}
