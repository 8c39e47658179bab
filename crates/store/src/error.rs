//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use exn::ResultExt;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Missing rows are never an error: lookups return empty results and
/// updates/deletes of unknown ids are no-ops.
#[derive(Debug, Display, Error, Eq, PartialEq)]
pub enum ErrorKind {
    /// Any database-layer fault: I/O, corruption, malformed statement, or a
    /// foreign key pointing at a set that does not exist.
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A value that must be unique (a set name) is already taken.
    #[display("unique constraint violated")]
    UniqueViolation,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }

    fn from_sqlx(err: &sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => Self::UniqueViolation,
            _ => Self::Database,
        }
    }
}

/// Raise sqlx errors into the store error tree, keeping unique constraint
/// violations distinguishable from every other database fault.
pub(crate) trait SqlxResultExt<T> {
    fn or_raise_db(self) -> Result<T>;
}
impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    #[track_caller]
    fn or_raise_db(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let kind = ErrorKind::from_sqlx(&err);
                Err(err).or_raise(|| kind)
            },
        }
    }
}
