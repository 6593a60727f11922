use crate::sql::{
    link_from_row, map_insert_error, map_sqlx_error, FIND_BY_ORIGINAL_URL, FIND_BY_SHORT_CODE,
    INSERT_LINK, SHORT_CODE_EXISTS,
};
use async_trait::async_trait;
use linkhop_core::store::{LinkStore, ReadLinkStore, Result, SchemaBootstrap};
use linkhop_core::{Link, ShortCode, StorageError};
use sqlx::MySqlPool;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/mysql/links.sql");

/// MySQL implementation of the link store contract.
///
/// `short_code` uses a binary collation so codes differing only in case are
/// distinct, matching the 62-symbol alphabet. Binary-collated columns come
/// back flagged as binary, so reads cast them to plain text.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl ReadLinkStore for MySqlLinkStore {
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
impl LinkStore for MySqlLinkStore {
    async fn create(&self, original_url: &str, code: &ShortCode) -> Result<Link> {
        let result = sqlx::query(INSERT_LINK)
            .bind(original_url)
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| map_insert_error(err, code))?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            StorageError::InvalidData(format!(
                "insert id {} does not fit a signed 64-bit id",
                result.last_insert_id()
            ))
        })?;
        debug!(code = %code, id, "inserted link");

        Ok(Link {
            id,
            original_url: original_url.to_owned(),
            short_code: code.clone(),
        })
    }
}

#[async_trait]
impl SchemaBootstrap for MySqlLinkStore {
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        info!("mysql schema ready");
        Ok(())
    }
}
