use crate::sql::{
    link_from_row, map_insert_error, map_sqlx_error, FIND_BY_ORIGINAL_URL, FIND_BY_SHORT_CODE,
    INSERT_LINK, SHORT_CODE_EXISTS,
};
use async_trait::async_trait;
use linkhop_core::store::{LinkStore, ReadLinkStore, Result, SchemaBootstrap};
use linkhop_core::{Link, ShortCode};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/sqlite/links.sql");

/// SQLite implementation of the link store contract.
///
/// The unique index on `short_code` is the source of truth for uniqueness;
/// a losing concurrent insert surfaces as `StorageError::Conflict`.
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
}

impl SqliteLinkStore {
    /// Creates a store from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReadLinkStore for SqliteLinkStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>> {
        let row = sqlx::query(FIND_BY_ORIGINAL_URL)
            .bind(original_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        let row = sqlx::query(FIND_BY_SHORT_CODE)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(SHORT_CODE_EXISTS)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn create(&self, original_url: &str, code: &ShortCode) -> Result<Link> {
        let result = sqlx::query(INSERT_LINK)
            .bind(original_url)
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| map_insert_error(err, code))?;

        let id = result.last_insert_rowid();
        debug!(code = %code, id, "inserted link");

        Ok(Link {
            id,
            original_url: original_url.to_owned(),
            short_code: code.clone(),
        })
    }
}

#[async_trait]
impl SchemaBootstrap for SqliteLinkStore {
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        info!("sqlite schema ready");
        Ok(())
    }
}
