use linkhop_core::{Link, ShortCode, StorageError};
use sqlx::{ColumnIndex, Decode, Row, Type};

// Both backends accept these statements. MySQL reports binary-collated
// columns as binary, so the text columns are cast back to CHAR on read.
pub(crate) const FIND_BY_ORIGINAL_URL: &str = r#"
    SELECT id,
           CAST(original_url AS CHAR) AS original_url,
           CAST(short_code AS CHAR) AS short_code
    FROM links
    WHERE original_url = ?
    ORDER BY id
    LIMIT 1
"#;

pub(crate) const FIND_BY_SHORT_CODE: &str = r#"
    SELECT id,
           CAST(original_url AS CHAR) AS original_url,
           CAST(short_code AS CHAR) AS short_code
    FROM links
    WHERE short_code = ?
    LIMIT 1
"#;

pub(crate) const SHORT_CODE_EXISTS: &str = r#"
    SELECT 1
    FROM links
    WHERE short_code = ?
    LIMIT 1
"#;

pub(crate) const INSERT_LINK: &str = r#"
    INSERT INTO links (original_url, short_code)
    VALUES (?, ?)
"#;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

/// Maps an insert failure, reporting unique violations as a conflict on `code`.
pub(crate) fn map_insert_error(err: sqlx::Error, code: &ShortCode) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::Conflict(code.to_string())
    } else {
        map_sqlx_error(err)
    }
}

/// Rebuilds a link from a row selected by one of the lookup statements.
pub(crate) fn link_from_row<R>(row: &R) -> Result<Link, StorageError>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    i64: for<'r> Decode<'r, R::Database> + Type<R::Database>,
    String: for<'r> Decode<'r, R::Database> + Type<R::Database>,
{
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;

    Ok(Link {
        id,
        original_url,
        short_code: ShortCode::new(short_code)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn link_from_row_reads_cast_columns() {
        let pool = pool().await;

        let row = sqlx::query(
            "SELECT 7 AS id, CAST('https://example.com' AS CHAR) AS original_url, \
             CAST('AbC123' AS CHAR) AS short_code",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let link = link_from_row(&row).unwrap();
        assert_eq!(link.id, 7);
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.short_code.as_str(), "AbC123");
    }

    #[tokio::test]
    async fn link_from_row_rejects_malformed_stored_codes() {
        let pool = pool().await;

        let row = sqlx::query(
            "SELECT 1 AS id, 'https://example.com' AS original_url, 'not valid' AS short_code",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let err = link_from_row(&row).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[tokio::test]
    async fn missing_columns_are_invalid_data() {
        let pool = pool().await;

        let row = sqlx::query("SELECT 1 AS id").fetch_one(&pool).await.unwrap();

        let err = link_from_row(&row).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }
}
