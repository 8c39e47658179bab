//! Repository for sets, their cards, and starred markers.
//!
//! They're tightly coupled: a card can't exist without its set, and a starred
//! marker is nothing more than the presence of a row pointing at a set.
//! Deleting a set cascades to both.

use crate::Database;
use crate::error::{Result, SqlxResultExt};
use crate::models::{Card, CardId, CardRow, Set, SetId, SetRow};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;
use std::collections::HashSet;

type CreatedSet = (SetId, Vec<Set>);

async fn fetch_sets<'c>(executor: impl SqliteExecutor<'c>) -> Result<Vec<Set>> {
    let rows: Vec<SetRow> = sqlx::query_as(include_str!("../queries/list_sets.sql"))
        .fetch_all(executor)
        .await
        .or_raise_db()?;
    Ok(rows.into_iter().map(Set::from).collect())
}

async fn fetch_cards<'c>(executor: impl SqliteExecutor<'c>, set_id: SetId) -> Result<Vec<Card>> {
    let rows: Vec<CardRow> = sqlx::query_as(include_str!("../queries/list_cards.sql"))
        .bind(set_id)
        .fetch_all(executor)
        .await
        .or_raise_db()?;
    Ok(rows.into_iter().map(Card::from).collect())
}

/// Repository for managing sets, cards and starred markers.
///
/// Every operation is a single statement, or a write plus the read-back of
/// the refreshed list inside one transaction. Missing ids are never an
/// error: lookups come back empty, and updates/deletes affect zero rows.
///
/// # Relationships
///
/// - A set owns zero or more cards; a card never moves between sets
/// - A set has at most one starred marker
/// - Deleting a set cascades to its cards and its starred marker
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    // =========================================================================
    // Sets
    // =========================================================================

    /// Create a set and return its id together with the refreshed list of
    /// all sets.
    ///
    /// Returns [`ErrorKind::UniqueViolation`](crate::error::ErrorKind::UniqueViolation)
    /// if a set with the same name already exists; the existing set is left
    /// untouched.
    pub async fn create_set(&self, name: impl AsRef<str>, category: impl AsRef<str>) -> Result<CreatedSet> {
        let mut tx = self.pool.begin().await.or_raise_db()?;
        let id: i64 = sqlx::query(include_str!("../queries/insert_set.sql"))
            .bind(name.as_ref())
            .bind(category.as_ref())
            .execute(&mut *tx)
            .await
            .or_raise_db()?
            .last_insert_rowid();
        let sets = fetch_sets(&mut *tx).await?;
        tx.commit().await.or_raise_db()?;
        tracing::debug!(set_id = id, name = name.as_ref(), "Created set");
        Ok((SetId::from(id), sets))
    }

    /// List all sets in insertion order.
    ///
    /// Callers that want a different order (starred first) reorder themselves.
    pub async fn list_sets(&self) -> Result<Vec<Set>> {
        fetch_sets(&self.pool).await
    }

    /// Get a single set by id.
    pub async fn get_set(&self, set_id: SetId) -> Result<Option<Set>> {
        let row: Option<SetRow> = sqlx::query_as(include_str!("../queries/get_set.sql"))
            .bind(set_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise_db()?;
        Ok(row.map(Set::from))
    }

    /// Rename and/or recategorise a set in place, returning the refreshed list
    /// of all sets.
    ///
    /// Renaming to a name held by another set fails with
    /// [`ErrorKind::UniqueViolation`](crate::error::ErrorKind::UniqueViolation),
    /// same as [`create_set`](Self::create_set). Unknown ids are a no-op.
    pub async fn update_set(
        &self,
        set_id: SetId,
        name: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Vec<Set>> {
        let mut tx = self.pool.begin().await.or_raise_db()?;
        sqlx::query(include_str!("../queries/update_set.sql"))
            .bind(name.as_ref())
            .bind(category.as_ref())
            .bind(set_id)
            .execute(&mut *tx)
            .await
            .or_raise_db()?;
        let sets = fetch_sets(&mut *tx).await?;
        tx.commit().await.or_raise_db()?;
        Ok(sets)
    }

    /// Delete a set, returning the refreshed list of all sets.
    ///
    /// Cards and the starred marker belonging to the set are removed by the
    /// database cascade. Deleting an unknown id is a no-op.
    pub async fn delete_set(&self, set_id: SetId) -> Result<Vec<Set>> {
        let mut tx = self.pool.begin().await.or_raise_db()?;
        let deleted = sqlx::query(include_str!("../queries/delete_set.sql"))
            .bind(set_id)
            .execute(&mut *tx)
            .await
            .or_raise_db()?
            .rows_affected();
        let sets = fetch_sets(&mut *tx).await?;
        tx.commit().await.or_raise_db()?;
        tracing::debug!(%set_id, deleted, "Deleted set");
        Ok(sets)
    }

    // =========================================================================
    // Cards
    // =========================================================================

    /// List the cards of a set in insertion order.
    pub async fn list_cards(&self, set_id: SetId) -> Result<Vec<Card>> {
        fetch_cards(&self.pool, set_id).await
    }

    /// Get a card by id.
    ///
    /// Returns a zero-or-one element list; an unknown id is an empty list,
    /// not an error.
    pub async fn get_card_by_id(&self, card_id: CardId) -> Result<Vec<Card>> {
        let rows: Vec<CardRow> = sqlx::query_as(include_str!("../queries/get_card_by_id.sql"))
            .bind(card_id)
            .fetch_all(&self.pool)
            .await
            .or_raise_db()?;
        Ok(rows.into_iter().map(Card::from).collect())
    }

    /// Add a card to a set and return the refreshed card list of that set.
    ///
    /// The set must exist: the foreign key rejects orphaned cards with
    /// [`ErrorKind::Database`](crate::error::ErrorKind::Database).
    pub async fn create_card(
        &self,
        question: impl AsRef<str>,
        answer: impl AsRef<str>,
        set_id: SetId,
    ) -> Result<Vec<Card>> {
        let mut tx = self.pool.begin().await.or_raise_db()?;
        sqlx::query(include_str!("../queries/insert_card.sql"))
            .bind(question.as_ref())
            .bind(answer.as_ref())
            .bind(set_id)
            .execute(&mut *tx)
            .await
            .or_raise_db()?;
        let cards = fetch_cards(&mut *tx, set_id).await?;
        tx.commit().await.or_raise_db()?;
        Ok(cards)
    }

    /// Replace the question and answer of a card.
    ///
    /// Returns `true` if a card was updated, `false` if `card_id` was not found.
    pub async fn update_card(
        &self,
        card_id: CardId,
        question: impl AsRef<str>,
        answer: impl AsRef<str>,
    ) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/update_card.sql"))
            .bind(question.as_ref())
            .bind(answer.as_ref())
            .bind(card_id)
            .execute(&self.pool)
            .await
            .or_raise_db()?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a card.
    ///
    /// Returns `true` if a card was deleted, `false` if `card_id` was not found.
    pub async fn delete_card(&self, card_id: CardId) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/delete_card.sql"))
            .bind(card_id)
            .execute(&self.pool)
            .await
            .or_raise_db()?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Starred
    // =========================================================================

    /// Star (`true`) or unstar (`false`) a set.
    ///
    /// Both directions are idempotent: starring a starred set or unstarring
    /// an unstarred one changes nothing.
    pub async fn toggle_starred(&self, set_id: SetId, starred: bool) -> Result<()> {
        let query = match starred {
            true => include_str!("../queries/star_set.sql"),
            false => include_str!("../queries/unstar_set.sql"),
        };
        sqlx::query(query).bind(set_id).execute(&self.pool).await.or_raise_db()?;
        Ok(())
    }

    /// Ids of all starred sets.
    pub async fn get_starred_sets(&self) -> Result<HashSet<SetId>> {
        let ids: Vec<SetId> = sqlx::query_scalar(include_str!("../queries/list_starred.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise_db()?;
        Ok(ids.into_iter().collect())
    }
}
