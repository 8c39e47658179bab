//! Reminder Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A reminder error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reminder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Eq, PartialEq)]
pub enum ErrorKind {
    /// The user has not granted notification permission.
    #[display("notification permission not granted")]
    PermissionDenied,
    /// Nothing is listening for reminders any more.
    #[display("reminder delivery unavailable")]
    Unavailable,
    /// The due time cannot be represented.
    #[display("reminder delay out of range")]
    OutOfRange,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
