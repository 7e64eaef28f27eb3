//! Shared paged query execution

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::data::sql::{WhereClause, order_by};
use crate::data::sqlite::SqliteError;
use crate::domain::search::{CompiledSearch, Predicate};

/// Row source of one search surface
pub struct Source {
    /// `FROM` body, including joins
    pub from: &'static str,
    /// Alias of the searched table inside `from`
    pub alias: &'static str,
    /// Select list
    pub columns: &'static str,
}

/// Run the page slice and the total count concurrently over the same predicate
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    source: &Source,
    search: &CompiledSearch,
) -> Result<(Vec<T>, u64), SqliteError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let clause = WhereClause::new(&search.predicate, source.alias);

    let list_sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {}, {}.id ASC LIMIT ? OFFSET ?",
        source.columns,
        source.from,
        clause.sql,
        order_by(&search.sort, source.alias),
        source.alias
    );
    let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", source.from, clause.sql);

    let mut list_params = clause.params.clone();
    list_params.push(search.page.limit());
    list_params.push(search.page.offset());
    let list_args = list_params.to_arguments()?;
    let count_args = clause.params.to_arguments()?;

    let items = sqlx::query_as_with::<_, T, _>(&list_sql, list_args).fetch_all(pool);
    let total = sqlx::query_scalar_with::<_, i64, _>(&count_sql, count_args).fetch_one(pool);
    let (items, total) = tokio::try_join!(items, total)?;

    Ok((items, total.max(0) as u64))
}

/// Fetch at most one row matching the predicate
pub async fn fetch_one<T>(
    pool: &SqlitePool,
    source: &Source,
    predicate: &Predicate,
) -> Result<Option<T>, SqliteError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let clause = WhereClause::new(predicate, source.alias);
    let sql = format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        source.columns, source.from, clause.sql
    );
    let row = sqlx::query_as_with::<_, T, _>(&sql, clause.params.to_arguments()?)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
