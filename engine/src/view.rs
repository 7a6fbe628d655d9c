use serde::{Deserialize, Serialize};

use crate::model::{BoardRef, Character, CharacterId, Culture, Item, Race, Specialization};
use crate::stats::{Actuals, Crafts, Stats};

/// Read model handed back to callers after any character operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterView {
    pub id: CharacterId,
    pub name: String,
    pub portrait_url: String,
    pub race: Race,
    pub culture: Culture,
    pub spec: Specialization,
    pub alive: bool,
    pub locked: bool,
    pub wealth: i32,
    pub renown: i32,
    pub level_points: i32,
    pub board: Option<BoardRef>,
    pub stats: Stats,
    pub crafts: Crafts,
    pub actuals: Actuals,
    pub fights: Option<Actuals>,
    pub inventory: Vec<Item>,
    pub regalia: Vec<Item>,
    pub supplies: Vec<Item>,
}

impl From<&Character> for CharacterView {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id(),
            name: c.details.name.clone(),
            portrait_url: c.details.portrait_url.clone(),
            race: c.details.race,
            culture: c.details.culture,
            spec: c.details.spec,
            alive: c.details.alive,
            locked: c.details.locked,
            wealth: c.details.wealth,
            renown: c.details.renown,
            level_points: c.details.level_points,
            board: c.details.board,
            stats: c.stats,
            crafts: c.crafts,
            actuals: c.actuals(),
            fights: c.fights,
            inventory: c.inventory.clone(),
            regalia: c.regalia.clone(),
            supplies: c.supplies.clone(),
        }
    }
}
