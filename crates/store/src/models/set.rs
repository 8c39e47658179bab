use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier of a [`Set`], assigned by the database on insert.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derive(sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SetId(i64);
impl SetId {
    pub fn get(self) -> i64 {
        self.0
    }
}

/// A named, categorised collection of cards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub id: SetId,
    /// Globally unique.
    pub name: String,
    pub category: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct SetRow {
    id: i64,
    name: String,
    // Nullable in the schema; an absent category reads as empty.
    category: Option<String>,
}
impl From<SetRow> for Set {
    fn from(row: SetRow) -> Self {
        Self {
            id: SetId(row.id),
            name: row.name,
            category: row.category.unwrap_or_default(),
        }
    }
}
