//! Schema introspection.
//!
//! Catalog queries are fixed strings in the `queries` submodule. A table name
//! supplied by the caller is always bound as a parameter, never formatted
//! into the SQL text.

use crate::db::executor::with_timeout;
use crate::db::pool::DbPool;
use crate::error::DbResult;
use crate::models::{ColumnDefinition, IndexColumn, TableInfo};
use std::time::Duration;
use tracing::debug;

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// Columns of one table, or of every table when `table_name` is `None`.
    ///
    /// Ordered by table name, then declared position. An unknown table yields
    /// an empty list.
    pub async fn list_columns(
        pool: &DbPool,
        table_name: Option<&str>,
        query_timeout: Duration,
    ) -> DbResult<Vec<ColumnDefinition>> {
        let fut = async {
            match pool {
                DbPool::MySql(p) => mysql::list_columns(p, table_name).await,
                DbPool::SQLite(p) => sqlite::list_columns(p, table_name).await,
            }
        };
        with_timeout("describe schema", query_timeout, fut).await
    }

    /// Index columns of one table, ordered by index name then sequence in index.
    pub async fn list_indexes(
        pool: &DbPool,
        table_name: &str,
        query_timeout: Duration,
    ) -> DbResult<Vec<IndexColumn>> {
        let fut = async {
            match pool {
                DbPool::MySql(p) => mysql::list_indexes(p, table_name).await,
                DbPool::SQLite(p) => sqlite::list_indexes(p, table_name).await,
            }
        };
        with_timeout("list indexes", query_timeout, fut).await
    }

    /// Every table and view in the current database, ordered by name.
    pub async fn list_tables(pool: &DbPool, query_timeout: Duration) -> DbResult<Vec<TableInfo>> {
        let fut = async {
            match pool {
                DbPool::MySql(p) => mysql::list_tables(p).await,
                DbPool::SQLite(p) => sqlite::list_tables(p).await,
            }
        };
        with_timeout("list tables", query_timeout, fut).await
    }
}

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    pub mod mysql {
        pub const TABLE_COLUMNS: &str = r#"
        SELECT
            CONVERT(TABLE_NAME USING utf8mb4) AS TABLE_NAME,
            CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
            CONVERT(COLUMN_TYPE USING utf8mb4) AS COLUMN_TYPE,
            CONVERT(IS_NULLABLE USING utf8mb4) AS IS_NULLABLE,
            CONVERT(COLUMN_DEFAULT USING utf8mb4) AS COLUMN_DEFAULT,
            CONVERT(COLUMN_KEY USING utf8mb4) AS COLUMN_KEY,
            CONVERT(EXTRA USING utf8mb4) AS EXTRA
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#;

        pub const ALL_COLUMNS: &str = r#"
        SELECT
            CONVERT(TABLE_NAME USING utf8mb4) AS TABLE_NAME,
            CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
            CONVERT(COLUMN_TYPE USING utf8mb4) AS COLUMN_TYPE,
            CONVERT(IS_NULLABLE USING utf8mb4) AS IS_NULLABLE,
            CONVERT(COLUMN_DEFAULT USING utf8mb4) AS COLUMN_DEFAULT,
            CONVERT(COLUMN_KEY USING utf8mb4) AS COLUMN_KEY,
            CONVERT(EXTRA USING utf8mb4) AS EXTRA
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
        ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#;

        pub const TABLE_INDEXES: &str = r#"
        SELECT
            CONVERT(INDEX_NAME USING utf8mb4) AS INDEX_NAME,
            CONVERT(COLUMN_NAME USING utf8mb4) AS COLUMN_NAME,
            NON_UNIQUE
        FROM information_schema.STATISTICS
        WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        ORDER BY INDEX_NAME, SEQ_IN_INDEX
        "#;

        pub const TABLES: &str = r#"
        SELECT
            CONVERT(TABLE_NAME USING utf8mb4) AS TABLE_NAME,
            CONVERT(TABLE_TYPE USING utf8mb4) AS TABLE_TYPE,
            CONVERT(ENGINE USING utf8mb4) AS ENGINE,
            TABLE_ROWS AS ROW_COUNT,
            DATA_LENGTH AS DATA_SIZE
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = DATABASE()
        ORDER BY TABLE_NAME
        "#;
    }

    pub mod sqlite {
        pub const TABLE_COLUMNS: &str = r#"
        SELECT ?1 AS table_name, name, type, "notnull", dflt_value, pk
        FROM pragma_table_info(?1)
        ORDER BY cid
        "#;

        pub const ALL_COLUMNS: &str = r#"
        SELECT m.name AS table_name, p.name, p.type, p."notnull", p.dflt_value, p.pk
        FROM sqlite_master m, pragma_table_info(m.name) p
        WHERE m.type IN ('table', 'view') AND m.name NOT LIKE 'sqlite_%'
        ORDER BY m.name, p.cid
        "#;

        pub const TABLE_INDEXES: &str = r#"
        SELECT il.name AS index_name, ii.name AS column_name, il."unique" AS is_unique
        FROM pragma_index_list(?) il, pragma_index_info(il.name) ii
        ORDER BY il.name, ii.seqno
        "#;

        pub const TABLES: &str = r#"
        SELECT name, type FROM sqlite_master
        WHERE type IN ('table', 'view')
        AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#;

        /// Only answers when SQLite is built with the dbstat virtual table.
        pub const TABLE_SIZE: &str = "SELECT SUM(pgsize) AS size_bytes FROM dbstat WHERE name = ?";
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod mysql {
    use super::*;
    use sqlx::mysql::MySqlRow;
    use sqlx::{MySqlPool, Row};

    /// MySQL 5.x may return BIGINT (i64), MySQL 8.x returns BIGINT UNSIGNED (u64).
    fn try_get_u64(row: &MySqlRow, column: &str) -> Option<u64> {
        if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(column) {
            return Some(v);
        }
        if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(column) {
            return Some(v as u64);
        }
        None
    }

    /// MySQL may return VARBINARY instead of VARCHAR depending on charset configuration.
    fn get_optional_string(row: &MySqlRow, column: &str) -> Option<String> {
        row.try_get::<Option<String>, _>(column)
            .ok()
            .flatten()
            .or_else(|| {
                row.try_get::<Option<Vec<u8>>, _>(column)
                    .ok()
                    .flatten()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
            })
    }

    fn get_string(row: &MySqlRow, column: &str) -> String {
        get_optional_string(row, column).unwrap_or_default()
    }

    fn column_from_row(row: &MySqlRow) -> ColumnDefinition {
        ColumnDefinition::new(
            get_string(row, "COLUMN_NAME"),
            get_string(row, "COLUMN_TYPE"),
            get_string(row, "IS_NULLABLE") == "YES",
        )
        .with_table(get_string(row, "TABLE_NAME"))
        .with_default(get_optional_string(row, "COLUMN_DEFAULT"))
        .with_key(get_string(row, "COLUMN_KEY"))
        .with_extra(get_string(row, "EXTRA"))
    }

    pub async fn list_columns(
        pool: &MySqlPool,
        table_name: Option<&str>,
    ) -> Result<Vec<ColumnDefinition>, sqlx::Error> {
        let rows = match table_name {
            Some(table) => {
                sqlx::query(queries::mysql::TABLE_COLUMNS)
                    .bind(table)
                    .fetch_all(pool)
                    .await?
            }
            None => sqlx::query(queries::mysql::ALL_COLUMNS).fetch_all(pool).await?,
        };

        let columns: Vec<_> = rows.iter().map(column_from_row).collect();
        debug!(count = columns.len(), table = ?table_name, "Listed MySQL columns");
        Ok(columns)
    }

    pub async fn list_indexes(
        pool: &MySqlPool,
        table_name: &str,
    ) -> Result<Vec<IndexColumn>, sqlx::Error> {
        let rows = sqlx::query(queries::mysql::TABLE_INDEXES)
            .bind(table_name)
            .fetch_all(pool)
            .await?;

        let indexes: Vec<_> = rows
            .iter()
            .map(|row| {
                IndexColumn::new(
                    get_string(row, "INDEX_NAME"),
                    get_string(row, "COLUMN_NAME"),
                    try_get_u64(row, "NON_UNIQUE") == Some(0),
                )
            })
            .collect();
        debug!(count = indexes.len(), table = %table_name, "Listed MySQL indexes");
        Ok(indexes)
    }

    pub async fn list_tables(pool: &MySqlPool) -> Result<Vec<TableInfo>, sqlx::Error> {
        let rows = sqlx::query(queries::mysql::TABLES).fetch_all(pool).await?;

        let tables: Vec<_> = rows
            .iter()
            .filter_map(|row| {
                let name = get_string(row, "TABLE_NAME");
                if name.is_empty() {
                    return None;
                }
                let mut table = TableInfo::new(name, get_string(row, "TABLE_TYPE"));
                if let Some(engine) = get_optional_string(row, "ENGINE") {
                    table = table.with_engine(engine);
                }
                if let Some(count) = try_get_u64(row, "ROW_COUNT") {
                    table = table.with_row_count(count);
                }
                if let Some(size) = try_get_u64(row, "DATA_SIZE") {
                    table = table.with_data_size(size);
                }
                Some(table)
            })
            .collect();

        debug!(count = tables.len(), "Listed MySQL tables");
        Ok(tables)
    }
}

mod sqlite {
    use super::*;
    use sqlx::sqlite::SqliteRow;
    use sqlx::{Row, SqlitePool};

    fn column_from_row(row: &SqliteRow) -> ColumnDefinition {
        let table: String = row.try_get("table_name").unwrap_or_default();
        let name: String = row.try_get("name").unwrap_or_default();
        let column_type: String = row.try_get("type").unwrap_or_default();
        let notnull: i64 = row.try_get("notnull").unwrap_or(0);
        let default: Option<String> = row.try_get("dflt_value").ok().flatten();
        let pk: i64 = row.try_get("pk").unwrap_or(0);

        ColumnDefinition::new(name, column_type, notnull == 0)
            .with_table(table)
            .with_default(default)
            .with_key(if pk > 0 { "PRI" } else { "" })
    }

    pub async fn list_columns(
        pool: &SqlitePool,
        table_name: Option<&str>,
    ) -> Result<Vec<ColumnDefinition>, sqlx::Error> {
        let rows = match table_name {
            Some(table) => {
                sqlx::query(queries::sqlite::TABLE_COLUMNS)
                    .bind(table)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                sqlx::query(queries::sqlite::ALL_COLUMNS)
                    .fetch_all(pool)
                    .await?
            }
        };

        let columns: Vec<_> = rows.iter().map(column_from_row).collect();
        debug!(count = columns.len(), table = ?table_name, "Listed SQLite columns");
        Ok(columns)
    }

    pub async fn list_indexes(
        pool: &SqlitePool,
        table_name: &str,
    ) -> Result<Vec<IndexColumn>, sqlx::Error> {
        let rows = sqlx::query(queries::sqlite::TABLE_INDEXES)
            .bind(table_name)
            .fetch_all(pool)
            .await?;

        let indexes: Vec<_> = rows
            .iter()
            .map(|row| {
                let index_name: String = row.try_get("index_name").unwrap_or_default();
                // Expression indexes have no column name
                let column_name: Option<String> = row.try_get("column_name").ok().flatten();
                let is_unique: i64 = row.try_get("is_unique").unwrap_or(0);
                IndexColumn::new(index_name, column_name.unwrap_or_default(), is_unique != 0)
            })
            .collect();
        debug!(count = indexes.len(), table = %table_name, "Listed SQLite indexes");
        Ok(indexes)
    }

    pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<TableInfo>, sqlx::Error> {
        let rows = sqlx::query(queries::sqlite::TABLES).fetch_all(pool).await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.try_get("name")?;
            let type_str: String = row.try_get("type")?;
            let table_type = if type_str == "view" { "VIEW" } else { "BASE TABLE" };
            let mut table = TableInfo::new(&name, table_type);

            if type_str == "table" {
                if let Some(size) = fetch_table_size(pool, &name).await {
                    table = table.with_data_size(size);
                }
            }
            tables.push(table);
        }

        debug!(count = tables.len(), "Listed SQLite tables");
        Ok(tables)
    }

    async fn fetch_table_size(pool: &SqlitePool, table_name: &str) -> Option<u64> {
        sqlx::query(queries::sqlite::TABLE_SIZE)
            .bind(table_name)
            .fetch_one(pool)
            .await
            .ok()
            .and_then(|row| row.try_get::<Option<i64>, _>("size_bytes").ok().flatten())
            .map(|size| size as u64)
    }
}
