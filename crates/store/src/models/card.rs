use crate::models::SetId;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier of a [`Card`], assigned by the database on insert.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derive(sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct CardId(i64);
impl CardId {
    pub fn get(self) -> i64 {
        self.0
    }
}

/// A question/answer pair owned by exactly one set for its whole lifetime.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    pub set_id: SetId,
}

#[derive(sqlx::FromRow)]
pub(crate) struct CardRow {
    id: i64,
    question: Option<String>,
    answer: Option<String>,
    set_id: i64,
}
impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Self {
            id: CardId(row.id),
            question: row.question.unwrap_or_default(),
            answer: row.answer.unwrap_or_default(),
            set_id: SetId::from(row.set_id),
        }
    }
}
