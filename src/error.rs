//! Recall Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the store, session and
//! reminder crates are kept as children in the error tree.

use derive_more::{Display, Error};
use recall_store::error::{Error as StoreError, ErrorKind as StoreErrorKind};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Eq, PartialEq)]
pub enum ErrorKind {
    /// Input rejected before it reached the store; show the message.
    #[display("{_0}")]
    Validation(#[error(not(source))] &'static str),
    /// A set with this name already exists.
    #[display("a set with this name already exists")]
    DuplicateName,
    /// Any other storage fault.
    #[display("storage error")]
    Store,
    /// Notification permission could not be queried or requested.
    #[display("notification error")]
    Reminder,
    /// A global logger is already installed, or the filter is malformed.
    #[display("could not initialise logging: {_0}")]
    Logging(#[error(not(source))] String),
}

impl ErrorKind {
    /// Raise a store error into the application error tree, keeping duplicate
    /// names distinguishable from every other storage fault.
    #[track_caller]
    pub fn store(err: StoreError) -> Error {
        let kind = match &*err {
            StoreErrorKind::UniqueViolation => Self::DuplicateName,
            _ => Self::Store,
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
