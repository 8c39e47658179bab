//! Session Error Types
//!
//! Structured errors using `exn` for automatic location tracking. Every
//! error here is a transition that the current state does not allow.

use crate::Mode;
use derive_more::{Display, Error};

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session transitions.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Eq, PartialEq)]
pub enum ErrorKind {
    /// No mode has been chosen yet.
    #[display("no study mode selected")]
    NotStarted,
    /// The chosen set has no cards; only a reset is possible.
    #[display("no cards available")]
    NoCards,
    /// The transition belongs to the other study mode.
    #[display("not available in {_0} mode")]
    WrongMode(#[error(not(source))] Mode),
    /// Feedback for the previous answer is still showing.
    #[display("answer feedback still pending")]
    FeedbackPending,
    /// There is no answer feedback to advance past.
    #[display("no answer feedback to complete")]
    NoFeedback,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
