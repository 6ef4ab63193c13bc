use thiserror::Error;

/// Core error type shared across libseed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be reached or the connection dropped.
    #[error("connection error: {0}")]
    Connection(String),
    /// Statement failed for a reason other than a constraint violation.
    #[error("database error: {0}")]
    Db(String),
    /// A row violated a constraint on a table whose conflict policy is `fail`.
    #[error("constraint violation: {0}")]
    Constraint(String),
    /// Run configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The value encoder only accepts null, text and numbers.
    #[error("unsupported value kind '{kind}' for statement literal")]
    UnsupportedValue { kind: &'static str },
    /// A foreign key was requested against a parent table with no rows.
    #[error("no parent rows in '{0}' to reference")]
    MissingParent(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by libseed crates.
pub type Result<T> = std::result::Result<T, Error>;
