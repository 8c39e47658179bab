mod card;
mod set;

pub use self::card::{Card, CardId};
pub(crate) use self::card::CardRow;
pub use self::set::{Set, SetId};
pub(crate) use self::set::SetRow;
