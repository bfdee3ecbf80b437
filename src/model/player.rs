use serde::{Deserialize, Serialize};

/// One player row from a roster table. Every field is kept as displayed on
/// the page, with an empty string standing in for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub number: String,
    pub name: String,
    /// Position code such as `D`, `F` or `F/D`.
    pub position: String,
    pub age: String,
    pub birth_year: String,
    pub birthplace: String,
    pub height: String,
    pub weight: String,
    pub shoots: String,
    /// Absolute URL of the player's profile page.
    pub player_link: String,
}

/// Players from a single roster page, in table order.
pub type PlayerList = Vec<PlayerRecord>;
