//! SQLite persistence for flashcard sets, cards and starred sets.
//!
//! # Architecture
//! The store keeps three entity types:
//! - **Sets**: named, categorised collections. Names are globally unique.
//! - **Cards**: question/answer pairs, each owned by exactly one set.
//! - **Starred markers**: the presence of a row marks a set as a favourite.
//!
//! Deleting a set cascades to its cards and its marker at the database
//! level, so no orphans can persist. The [`Database`] handle is constructed
//! explicitly and passed around; there is no process-wide connection.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{Card, CardId, Set, SetId};
pub use crate::repo::Repository;
