//! Row generation for libseed.
//!
//! Declares the seeded tables and their conflict policies, splits row
//! targets into batches, and produces deterministic fake rows whose foreign
//! keys fall inside the id ranges of already-loaded parents.

pub mod batch;
pub mod catalog;
pub mod foreign;
pub mod rows;

pub use batch::{BatchBuilder, Batches};
pub use catalog::{ConflictPolicy, Entity, GENRES, SeedRow, TableSpec};
pub use foreign::{ForeignContext, ParentRange, PositionalIds, pick_existing_id};
pub use rows::{
    AuthorRow, BookCopyRow, BookRow, GenreRow, RowFactory, TransactionRow, TransactionStatus,
    UserRole, UserRow, copy_barcode, user_email,
};
