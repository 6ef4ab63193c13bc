//! Bulk loading of generated rows into a relational store.

pub mod loader;
pub mod pipeline;
pub mod postgres;
pub mod report;
pub mod store;

pub use loader::{insert_batch, insert_rows, insert_statement};
pub use pipeline::SeedPipeline;
pub use postgres::PostgresStore;
pub use report::{SeedReport, TableCount, TableReport, count_tables};
pub use store::Store;
