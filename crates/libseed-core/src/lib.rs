//! Core contracts and helpers for libseed.
//!
//! Holds the run configuration, the value model with its SQL literal
//! encoder, connection settings, and the error type shared by the loader
//! crates and the CLI.

pub mod config;
pub mod error;
pub mod redaction;
pub mod value;

pub use config::{DateWindow, IndexSpec, SeedConfig, TargetCounts};
pub use error::{Error, Result};
pub use redaction::{ConnectionSettings, RedactedConnection};
pub use value::{encode_row, encode_value, Value};
