//! In-memory study session state machine.
//!
//! A session starts in mode selection. Choosing a mode loads the cards of a
//! set (fetched once by the caller) and studies them either by swiping cards
//! or by typing answers. Resetting drops the cards and returns to mode
//! selection. Nothing here touches storage or timers: delays are reported to
//! the caller, who drives them.

pub mod error;
mod feedback;
mod mode;
mod session;

pub use crate::feedback::{Feedback, FeedbackTiming};
pub use crate::mode::{Mode, SwipeDirection};
pub use crate::session::{Phase, Session, Tally, Verdict, answers_match};
