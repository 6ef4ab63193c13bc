use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of rows requested per generated table.
///
/// Genres are not listed: they always come from the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCounts {
    pub authors: u64,
    pub books: u64,
    pub users: u64,
    pub book_copies: u64,
    pub transactions: u64,
}

impl Default for TargetCounts {
    fn default() -> Self {
        Self {
            authors: 5_000,
            books: 50_000,
            users: 20_000,
            book_copies: 2_000_000,
            transactions: 5_000_000,
        }
    }
}

/// Inclusive calendar window that transaction dates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidConfig(format!(
                "date window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Days between start and end, inclusive of both.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap_or_default(),
        }
    }
}

/// Secondary index that is dropped before the bulk load and rebuilt after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub table: String,
    pub column: String,
}

impl IndexSpec {
    pub fn new(name: &str, table: &str, column: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP INDEX IF EXISTS {}", self.name)
    }

    pub fn create_statement(&self) -> String {
        format!("CREATE INDEX {} ON {}({})", self.name, self.table, self.column)
    }
}

/// Every tunable of a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub targets: TargetCounts,
    /// Rows per INSERT statement.
    pub batch_size: usize,
    pub date_window: DateWindow,
    pub indexes: Vec<IndexSpec>,
    /// Emit a progress line every this many batches on the large loads.
    pub progress_every_batches: u64,
    /// Seed for the row generators.
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            targets: TargetCounts::default(),
            batch_size: 5_000,
            date_window: DateWindow::default(),
            indexes: default_indexes(),
            progress_every_batches: 20,
            seed: 123,
        }
    }
}

impl SeedConfig {
    /// Scaled-down targets used for smoke runs against a fresh store.
    pub fn smoke() -> Self {
        Self {
            targets: TargetCounts {
                authors: 5,
                books: 10,
                users: 10,
                book_copies: 20,
                transactions: 50,
            },
            batch_size: 8,
            progress_every_batches: 2,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".to_string()));
        }
        if self.progress_every_batches == 0 {
            return Err(Error::InvalidConfig(
                "progress_every_batches must be at least 1".to_string(),
            ));
        }
        DateWindow::new(self.date_window.start, self.date_window.end)?;
        for index in &self.indexes {
            if index.name.is_empty() || index.table.is_empty() || index.column.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "index definition '{}' is incomplete",
                    index.name
                )));
            }
        }
        Ok(())
    }
}

fn default_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::new("idx_books_author", "books", "author_id"),
        IndexSpec::new("idx_book_copies_book", "book_copies", "book_id"),
        IndexSpec::new("idx_transactions_user", "transactions", "user_id"),
        IndexSpec::new("idx_transactions_copy", "transactions", "copy_id"),
    ]
}
