use sqlx::PgPool;
use sqlx::error::ErrorKind;

use libseed_core::{Error, Result};

pub async fn fetch_database_name(pool: &PgPool) -> Result<String> {
    sqlx::query_scalar::<_, String>("select current_database()")
        .fetch_one(pool)
        .await
        .map_err(map_db_error)
}

/// Simple query protocol: the statement is neither prepared nor cached.
pub async fn execute(pool: &PgPool, sql: &str) -> Result<u64> {
    let result = sqlx::raw_sql(sql).execute(pool).await.map_err(map_db_error)?;
    Ok(result.rows_affected())
}

pub async fn count_rows(pool: &PgPool, table: &str) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(pool)
        .await
        .map_err(map_db_error)?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Sort a driver error into the seeder's taxonomy.
pub fn map_db_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => {
                let constraint = db.constraint().unwrap_or("unnamed");
                Error::Constraint(format!("{} ({constraint})", db.message()))
            }
            _ => Error::Db(err.to_string()),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Error::Connection(err.to_string()),
        _ => Error::Db(err.to_string()),
    }
}
