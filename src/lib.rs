//! Recall: the core of a flashcard study app.
//!
//! Sets of question/answer cards live in SQLite ([`recall_store`]), are
//! studied through an in-memory state machine ([`recall_session`]), and each
//! study session asks a [`ReminderScheduler`] to bring the user back later
//! ([`recall_reminder`]). [`Recall`] ties these together for the screens.
//!
//! ```no_run
//! # async fn run() -> recall::error::Result<()> {
//! use recall::{Config, LocalScheduler, Mode, Recall};
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! recall::logging::init(&config.logging)?;
//! let (scheduler, _reminders) = LocalScheduler::new();
//! let app = Recall::open(config, Arc::new(scheduler)).await?;
//!
//! let set_id = app.create_set("Biology", "Science").await?;
//! app.save_card(set_id, None, "What is DNA?", "Deoxyribonucleic acid").await?;
//!
//! let mut session = app.new_session();
//! app.start_session(&mut session, set_id, Mode::QuestionAnswer).await?;
//! # Ok(())
//! # }
//! ```

mod app;
pub mod error;
pub mod logging;

pub use crate::app::{Recall, SetEntry, sort_starred_first};
pub use recall_config::Config;
pub use recall_reminder::{LocalScheduler, Permission, Reminder, ReminderScheduler, SchedulerHandle};
pub use recall_session::{Feedback, FeedbackTiming, Mode, Phase, Session, SwipeDirection, Tally, Verdict};
pub use recall_store::{Card, CardId, Set, SetId};
