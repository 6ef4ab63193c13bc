use async_trait::async_trait;

use libseed_core::Result;

/// The one external collaborator of the seeder: something that executes SQL.
///
/// Implementations own a single connection; statements run one at a time.
#[async_trait]
pub trait Store: Send {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Execute one statement and return the number of rows it affected.
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// `SELECT COUNT(*) FROM <table>`.
    async fn count_rows(&mut self, table: &str) -> Result<u64>;

    /// Release the connection. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}
