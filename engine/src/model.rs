use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::stats::{compute_actuals, Actuals, CraftKind, Crafts, Stats};

pub const INVENTORY_CAP: usize = 4;
pub const REGALIA_CAP: usize = 10;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = GameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map($name).map_err(|_| {
                    GameError::validation(format!(
                        "malformed {} '{}'",
                        stringify!($name),
                        s
                    ))
                })
            }
        }
    };
}

id_type!(CharacterId);
id_type!(
    /// Proof of ownership handed to whoever created the character.
    SessionId
);
id_type!(ItemId);
id_type!(BoardId);

/// Parse a user-facing enum name into a validation error on failure.
pub(crate) fn parse_choice<T: FromStr>(what: &str, raw: &str) -> Result<T, GameError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| GameError::validation(format!("unknown {} '{}'", what, raw.trim())))
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Orc,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Culture {
    Highborn,
    Nomad,
    Tribal,
    Urban,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Specialization {
    Melee,
    Tracking,
    Sorcery,
}

impl Specialization {
    /// The craft whose effectiveness multiplies this spec's damage.
    pub fn craft(self) -> CraftKind {
        match self {
            Specialization::Melee => CraftKind::Melee,
            Specialization::Tracking => CraftKind::Tracking,
            Specialization::Sorcery => CraftKind::Sorcery,
        }
    }
}

/// Difficulty tier for a duel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffortLevel {
    Casual,
    Standard,
    Hard,
    Deadly,
}

impl EffortLevel {
    /// DC for the pre-fight tactical check.
    pub fn dc(self) -> i32 {
        match self {
            EffortLevel::Casual => 8,
            EffortLevel::Standard => 12,
            EffortLevel::Hard => 16,
            EffortLevel::Deadly => 20,
        }
    }

    /// Percentage applied to a generated opponent's banded attributes.
    pub fn opponent_scale_pct(self) -> i32 {
        match self {
            EffortLevel::Casual => 75,
            EffortLevel::Standard => 100,
            EffortLevel::Hard => 125,
            EffortLevel::Deadly => 150,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    Weapon,
    Shield,
    Armour,
    Trinket,
}

impl ItemCategory {
    /// How many of this category an inventory may hold; trinkets live in
    /// the regalia instead.
    pub fn inventory_limit(self) -> Option<usize> {
        match self {
            ItemCategory::Armour => Some(1),
            ItemCategory::Shield => Some(2),
            ItemCategory::Weapon => Some(3),
            ItemCategory::Trinket => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Shield,
    Armour,
    Trinket { permanent: bool },
}

impl ItemKind {
    pub fn category(self) -> ItemCategory {
        match self {
            ItemKind::Weapon => ItemCategory::Weapon,
            ItemKind::Shield => ItemCategory::Shield,
            ItemKind::Armour => ItemCategory::Armour,
            ItemKind::Trinket { .. } => ItemCategory::Trinket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub icon: String,
    pub tainted: bool,
    pub tier: i32,
    pub stats: Stats,
    pub crafts: Crafts,
    pub value: i32,
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    pub fn is_trinket(&self) -> bool {
        matches!(self.kind, ItemKind::Trinket { .. })
    }
}

/// The id pair a caller presents to act on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterIdentity {
    pub id: CharacterId,
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: CharacterId,
    pub session_id: SessionId,
    /// Owned by a player (as opposed to the world itself).
    pub player: bool,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoardKind {
    Duel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: BoardId,
    pub kind: BoardKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub name: String,
    pub portrait_url: String,
    pub race: Race,
    pub culture: Culture,
    pub spec: Specialization,
    pub alive: bool,
    pub locked: bool,
    pub hidden: bool,
    pub npc: bool,
    pub wealth: i32,
    pub renown: i32,
    pub level_points: i32,
    pub board: Option<BoardRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub identity: Identity,
    pub details: Details,
    pub stats: Stats,
    pub crafts: Crafts,
    pub inventory: Vec<Item>,
    pub regalia: Vec<Item>,
    pub supplies: Vec<Item>,
    /// Combat-only copy of the actuals; present while on a board.
    pub fights: Option<Actuals>,
}

impl Character {
    pub fn id(&self) -> CharacterId {
        self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn actuals(&self) -> Actuals {
        compute_actuals(self)
    }

    pub fn identity_pair(&self) -> CharacterIdentity {
        CharacterIdentity { id: self.identity.id, session_id: self.identity.session_id }
    }

    pub fn owns(&self, session_id: SessionId) -> bool {
        self.identity.session_id == session_id
    }

    pub fn on_board(&self) -> bool {
        self.details.board.is_some()
    }

    /// Items of `category` currently equipped in the inventory.
    pub fn equipped_count(&self, category: ItemCategory) -> usize {
        self.inventory.iter().filter(|i| i.category() == category).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Good,
    Bad,
}

/// Duel-only board state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelState {
    pub effort: EffortLevel,
    /// Living combatants in acting order; the front holds the turn.
    pub turn_queue: VecDeque<CharacterId>,
    pub turns_this_round: usize,
    /// Actions withheld from a combatant's refills after losing the tactical contest.
    pub action_penalty: Option<(CharacterId, i32)>,
}

impl DuelState {
    pub fn current(&self) -> Option<CharacterId> {
        self.turn_queue.front().copied()
    }

    pub fn penalty_for(&self, id: CharacterId) -> i32 {
        match self.action_penalty {
            Some((who, amount)) if who == id => amount,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub kind: BoardKind,
    pub good_guys: Vec<CharacterId>,
    pub bad_guys: Vec<CharacterId>,
    pub round: u32,
    /// Outcome of the most recent action; overwritten every time.
    pub message: String,
    pub log: Vec<String>,
    /// Set once one side has no living combatants left.
    pub winner: Option<Side>,
    pub duel: Option<DuelState>,
}

impl Board {
    pub fn new_duel(
        id: BoardId,
        hero: CharacterId,
        opponent: CharacterId,
        effort: EffortLevel,
    ) -> Self {
        Self {
            id,
            kind: BoardKind::Duel,
            good_guys: vec![hero],
            bad_guys: vec![opponent],
            round: 1,
            message: String::new(),
            log: Vec::new(),
            winner: None,
            duel: Some(DuelState {
                effort,
                turn_queue: VecDeque::from([hero, opponent]),
                turns_this_round: 0,
                action_penalty: None,
            }),
        }
    }

    pub fn board_ref(&self) -> BoardRef {
        BoardRef { id: self.id, kind: self.kind }
    }

    pub fn side_of(&self, id: CharacterId) -> Option<Side> {
        if self.good_guys.contains(&id) {
            Some(Side::Good)
        } else if self.bad_guys.contains(&id) {
            Some(Side::Bad)
        } else {
            None
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.good_guys.iter().chain(self.bad_guys.iter()).copied()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Overwrite the current message and keep it in the log.
    pub fn announce(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.log.push(self.message.clone());
    }
}
