use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use libseed_core::{ConnectionSettings, Error, Result};

use crate::store::Store;

mod queries;

pub use queries::map_db_error;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// PostgreSQL store backed by a single pooled connection.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using discrete settings.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database);
        Self::connect_with(options).await
    }

    async fn connect_with(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Wrap a pre-configured pool. It should hold at most one connection.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn database_name(&self) -> Result<String> {
        queries::fetch_database_name(&self.pool).await
    }
}

#[async_trait]
impl Store for PostgresStore {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        queries::execute(&self.pool, sql).await
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64> {
        queries::count_rows(&self.pool, table).await
    }

    async fn close(&mut self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
