#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode, OptionalExtension};

use libseed_core::Error;
use libseed_load::Store;

/// In-memory SQLite database behind the [`Store`] trait.
///
/// Clones share the database and the closed flag, so a test can keep a
/// handle after moving one into a pipeline. Closing only ends the session;
/// the data stays readable for assertions.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    closed: Arc<AtomicBool>,
}

impl SqliteStore {
    /// The six library tables with foreign keys, `users.email` unique and
    /// the four secondary indexes.
    pub fn library() -> Result<Self> {
        Self::with_schema(include_str!("../fixtures/library_sqlite.sql"))
    }

    pub fn with_schema(ddl: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(ddl)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Run statements outside the [`Store`] session.
    pub fn run(&self, sql: &str) -> Result<()> {
        self.lock().execute_batch(sql)?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Start a new session on the same database.
    pub fn reopen(&self) -> Self {
        self.closed.store(false, Ordering::SeqCst);
        self.clone()
    }

    pub fn row_count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count: i64 = self.lock().query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn ints(&self, table: &str, column: &str) -> Result<Vec<i64>> {
        self.column(table, column)
    }

    pub fn texts(&self, table: &str, column: &str) -> Result<Vec<Option<String>>> {
        self.column(table, column)
    }

    /// `(table, column)` covered by the index `name`, if it exists.
    pub fn index_target(&self, name: &str) -> Result<Option<(String, String)>> {
        let conn = self.lock();
        let table: Option<String> = conn
            .query_row(
                "SELECT tbl_name FROM sqlite_master WHERE type = 'index' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(table) = table else {
            return Ok(None);
        };
        let column: String =
            conn.query_row("SELECT name FROM pragma_index_info(?1)", [name], |row| row.get(0))?;
        Ok(Some((table, column)))
    }

    fn column<T: rusqlite::types::FromSql>(&self, table: &str, column: &str) -> Result<Vec<T>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!("SELECT {column} FROM {table} ORDER BY id"))?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(values)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn ensure_open(&self) -> libseed_core::Result<()> {
        if self.is_closed() {
            return Err(Error::Connection("store is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&mut self, sql: &str) -> libseed_core::Result<u64> {
        self.ensure_open()?;
        let changed = self.lock().execute(sql, []).map_err(map_sqlite_error)?;
        Ok(changed as u64)
    }

    async fn count_rows(&mut self, table: &str) -> libseed_core::Result<u64> {
        self.ensure_open()?;
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count: i64 = self
            .lock()
            .query_row(&sql, [], |row| row.get(0))
            .map_err(map_sqlite_error)?;
        Ok(count as u64)
    }

    async fn close(&mut self) -> libseed_core::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn map_sqlite_error(err: rusqlite::Error) -> Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => Error::Constraint(err.to_string()),
        _ => Error::Db(err.to_string()),
    }
}
