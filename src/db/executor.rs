//! Statement execution.
//!
//! Free-form statements run unprepared and without parameters: the caller's
//! text is the whole statement. Each call checks a connection out of the pool
//! for the duration of one statement and returns it afterwards. Every call is
//! bounded by the configured execution timeout.
//!
//! Text holding several statements yields one result set per statement. Only
//! the first is read; later ones are dropped unread.

use crate::db::pool::DbPool;
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::QueryResult;
use futures_util::{Stream, TryStreamExt};
use sqlx::Either;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Query executor that handles database query execution.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Run one statement and collect the rows of its result set.
    pub async fn execute_query(&self, pool: &DbPool, sql: &str) -> DbResult<QueryResult> {
        let start = Instant::now();

        debug!(
            sql = %sql,
            timeout_secs = self.query_timeout.as_secs(),
            "Executing query"
        );

        match pool {
            DbPool::MySql(p) => {
                let rows = mysql::fetch_rows(p, sql, self.query_timeout).await?;
                Ok(process_rows(rows, start))
            }
            DbPool::SQLite(p) => {
                let rows = sqlite::fetch_rows(p, sql, self.query_timeout).await?;
                Ok(process_rows(rows, start))
            }
        }
    }
}

/// Convert fetched rows into a QueryResult, preserving fetch order.
fn process_rows<R: RowToJson>(rows: Vec<R>, start: Instant) -> QueryResult {
    let execution_time_ms = start.elapsed().as_millis() as u64;

    let columns = rows
        .first()
        .map(|r| r.get_column_metadata())
        .unwrap_or_default();
    let json_rows = rows.iter().map(|r| r.to_json_map()).collect();

    QueryResult::new(columns, json_rows, execution_time_ms)
}

/// Collect rows up to the end of the first result set.
async fn first_result_set<D, R, S>(mut results: S) -> Result<Vec<R>, sqlx::Error>
where
    S: Stream<Item = Result<Either<D, R>, sqlx::Error>> + Unpin,
{
    let mut rows = Vec::new();
    while let Some(item) = results.try_next().await? {
        match item {
            Either::Left(_) => break,
            Either::Right(row) => rows.push(row),
        }
    }
    Ok(rows)
}

/// Bound a database future by the execution timeout.
pub(crate) async fn with_timeout<T, F>(operation: &str, limit: Duration, fut: F) -> DbResult<T>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => Err(DbError::timeout(operation, limit.as_secs())),
    }
}

mod mysql {
    use super::*;
    use sqlx::MySqlPool;
    use sqlx::mysql::MySqlRow;

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        query_timeout: Duration,
    ) -> DbResult<Vec<MySqlRow>> {
        // Raw SQL avoids prepared statements, which SHOW and some EXPLAIN forms reject
        use sqlx::Executor;
        let rows = first_result_set(pool.fetch_many(sql));
        with_timeout("query execution", query_timeout, rows).await
    }
}

mod sqlite {
    use super::*;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqliteRow;

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        query_timeout: Duration,
    ) -> DbResult<Vec<SqliteRow>> {
        use sqlx::Executor;
        let rows = first_result_set(pool.fetch_many(sql));
        with_timeout("query execution", query_timeout, rows).await
    }
}
