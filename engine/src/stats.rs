use std::ops::AddAssign;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::GameError;
use crate::model::Character;

pub const DEFENSE_CAP: i32 = 90;
pub const RESIST_CAP: i32 = 100;

/// Base effectiveness percentage and the bonus each craft level adds to it.
const EFFECTIVENESS_BASE: i32 = 100;
const EFFECTIVENESS_PER_LEVEL: i32 = 5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Might,
    Agility,
    Vigor,
    Combat,
    Tactics,
    Abstract,
    Arcane,
    Cunning,
    Presence,
    Wits,
    Defense,
    Resist,
    Actions,
    Endurance,
    Accretion,
}

impl StatKind {
    /// The five depletable combat assets (the rest are primary traits).
    pub const ASSETS: [StatKind; 5] = [
        StatKind::Defense,
        StatKind::Resist,
        StatKind::Actions,
        StatKind::Endurance,
        StatKind::Accretion,
    ];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CraftKind {
    Melee,
    Tracking,
    Sorcery,
    Stealth,
    Alchemy,
    Smithing,
    Herbalism,
    Leatherwork,
    Enchanting,
    Trading,
    Leadership,
}

impl CraftKind {
    /// Skills an item can roll a bonus for. Leadership only comes from
    /// upbringing and level-ups.
    pub const ITEM_SKILLS: [CraftKind; 10] = [
        CraftKind::Melee,
        CraftKind::Tracking,
        CraftKind::Sorcery,
        CraftKind::Stealth,
        CraftKind::Alchemy,
        CraftKind::Smithing,
        CraftKind::Herbalism,
        CraftKind::Leatherwork,
        CraftKind::Enchanting,
        CraftKind::Trading,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub might: i32,
    pub agility: i32,
    pub vigor: i32,
    pub combat: i32,
    pub tactics: i32,
    #[serde(rename = "abstract")]
    pub abstract_: i32,
    pub arcane: i32,
    pub cunning: i32,
    pub presence: i32,
    pub wits: i32,
    pub defense: i32,
    pub resist: i32,
    pub actions: i32,
    pub endurance: i32,
    pub accretion: i32,
}

impl Stats {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Might => self.might,
            StatKind::Agility => self.agility,
            StatKind::Vigor => self.vigor,
            StatKind::Combat => self.combat,
            StatKind::Tactics => self.tactics,
            StatKind::Abstract => self.abstract_,
            StatKind::Arcane => self.arcane,
            StatKind::Cunning => self.cunning,
            StatKind::Presence => self.presence,
            StatKind::Wits => self.wits,
            StatKind::Defense => self.defense,
            StatKind::Resist => self.resist,
            StatKind::Actions => self.actions,
            StatKind::Endurance => self.endurance,
            StatKind::Accretion => self.accretion,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Might => &mut self.might,
            StatKind::Agility => &mut self.agility,
            StatKind::Vigor => &mut self.vigor,
            StatKind::Combat => &mut self.combat,
            StatKind::Tactics => &mut self.tactics,
            StatKind::Abstract => &mut self.abstract_,
            StatKind::Arcane => &mut self.arcane,
            StatKind::Cunning => &mut self.cunning,
            StatKind::Presence => &mut self.presence,
            StatKind::Wits => &mut self.wits,
            StatKind::Defense => &mut self.defense,
            StatKind::Resist => &mut self.resist,
            StatKind::Actions => &mut self.actions,
            StatKind::Endurance => &mut self.endurance,
            StatKind::Accretion => &mut self.accretion,
        }
    }

    /// Field-wise transform, visiting fields in declaration order.
    pub fn map(&self, mut f: impl FnMut(StatKind, i32) -> i32) -> Stats {
        let mut out = Stats::default();
        for kind in StatKind::iter() {
            *out.get_mut(kind) = f(kind, self.get(kind));
        }
        out
    }

    /// Clamp the percentage-like fields to their ceilings.
    pub fn apply_caps(&mut self) {
        self.defense = self.defense.min(DEFENSE_CAP);
        self.resist = self.resist.min(RESIST_CAP);
    }
}

impl AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, rhs: &Stats) {
        for kind in StatKind::iter() {
            *self.get_mut(kind) += rhs.get(kind);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Crafts {
    pub melee: i32,
    pub tracking: i32,
    pub sorcery: i32,
    pub stealth: i32,
    pub alchemy: i32,
    pub smithing: i32,
    pub herbalism: i32,
    pub leatherwork: i32,
    pub enchanting: i32,
    pub trading: i32,
    pub leadership: i32,
}

impl Crafts {
    pub fn get(&self, kind: CraftKind) -> i32 {
        match kind {
            CraftKind::Melee => self.melee,
            CraftKind::Tracking => self.tracking,
            CraftKind::Sorcery => self.sorcery,
            CraftKind::Stealth => self.stealth,
            CraftKind::Alchemy => self.alchemy,
            CraftKind::Smithing => self.smithing,
            CraftKind::Herbalism => self.herbalism,
            CraftKind::Leatherwork => self.leatherwork,
            CraftKind::Enchanting => self.enchanting,
            CraftKind::Trading => self.trading,
            CraftKind::Leadership => self.leadership,
        }
    }

    pub fn get_mut(&mut self, kind: CraftKind) -> &mut i32 {
        match kind {
            CraftKind::Melee => &mut self.melee,
            CraftKind::Tracking => &mut self.tracking,
            CraftKind::Sorcery => &mut self.sorcery,
            CraftKind::Stealth => &mut self.stealth,
            CraftKind::Alchemy => &mut self.alchemy,
            CraftKind::Smithing => &mut self.smithing,
            CraftKind::Herbalism => &mut self.herbalism,
            CraftKind::Leatherwork => &mut self.leatherwork,
            CraftKind::Enchanting => &mut self.enchanting,
            CraftKind::Trading => &mut self.trading,
            CraftKind::Leadership => &mut self.leadership,
        }
    }

    pub fn map(&self, mut f: impl FnMut(CraftKind, i32) -> i32) -> Crafts {
        let mut out = Crafts::default();
        for kind in CraftKind::iter() {
            *out.get_mut(kind) = f(kind, self.get(kind));
        }
        out
    }

    /// Per-craft effectiveness percentage derived from craft levels.
    pub fn effectiveness(&self) -> Crafts {
        self.map(|_, level| (EFFECTIVENESS_BASE + EFFECTIVENESS_PER_LEVEL * level).max(0))
    }
}

impl AddAssign<&Crafts> for Crafts {
    fn add_assign(&mut self, rhs: &Crafts) {
        for kind in CraftKind::iter() {
            *self.get_mut(kind) += rhs.get(kind);
        }
    }
}

/// Any attribute a level-up can raise, resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Stat(StatKind),
    Craft(CraftKind),
}

impl Attribute {
    pub fn get(self, stats: &Stats, crafts: &Crafts) -> i32 {
        match self {
            Attribute::Stat(kind) => stats.get(kind),
            Attribute::Craft(kind) => crafts.get(kind),
        }
    }

    pub fn get_mut<'a>(self, stats: &'a mut Stats, crafts: &'a mut Crafts) -> &'a mut i32 {
        match self {
            Attribute::Stat(kind) => stats.get_mut(kind),
            Attribute::Craft(kind) => crafts.get_mut(kind),
        }
    }
}

impl FromStr for Attribute {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Ok(kind) = StatKind::from_str(name) {
            return Ok(Attribute::Stat(kind));
        }
        if let Ok(kind) = CraftKind::from_str(name) {
            return Ok(Attribute::Craft(kind));
        }
        Err(GameError::validation(format!("unknown attribute '{}'", name)))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Stat(kind) => write!(f, "{}", kind),
            Attribute::Craft(kind) => write!(f, "{}", kind),
        }
    }
}

/// Effective attributes: base plus equipment, capped, with derived
/// effectiveness percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Actuals {
    pub stats: Stats,
    pub crafts: Crafts,
    pub effectiveness: Crafts,
}

impl Actuals {
    /// Damage multiplier (percent) for attacks made through `craft`.
    pub fn effectiveness_of(&self, craft: CraftKind) -> i32 {
        self.effectiveness.get(craft)
    }
}

/// Sum base attributes with every inventory and regalia bonus, then cap.
/// Supplies never contribute.
pub fn compute_actuals(character: &Character) -> Actuals {
    let mut stats = character.stats;
    let mut crafts = character.crafts;
    for item in character.inventory.iter().chain(character.regalia.iter()) {
        stats += &item.stats;
        crafts += &item.crafts;
    }
    stats.apply_caps();
    Actuals { stats, crafts, effectiveness: crafts.effectiveness() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_resolve_both_tables() {
        assert_eq!(
            "Abstract".parse::<Attribute>().unwrap(),
            Attribute::Stat(StatKind::Abstract)
        );
        assert_eq!(
            " sorcery ".parse::<Attribute>().unwrap(),
            Attribute::Craft(CraftKind::Sorcery)
        );
        assert!("charisma".parse::<Attribute>().unwrap_err().is_validation());
    }

    #[test]
    fn attribute_reads_and_writes_the_same_slot() {
        let mut stats = Stats { wits: 4, ..Default::default() };
        let mut crafts = Crafts { alchemy: 2, ..Default::default() };
        let wits = Attribute::Stat(StatKind::Wits);
        let alchemy = Attribute::Craft(CraftKind::Alchemy);

        *wits.get_mut(&mut stats, &mut crafts) += 3;
        *alchemy.get_mut(&mut stats, &mut crafts) += 1;
        assert_eq!(wits.get(&stats, &crafts), 7);
        assert_eq!(alchemy.get(&stats, &crafts), 3);
        assert_eq!(stats.might, 0);
    }

    #[test]
    fn caps_only_touch_defense_and_resist() {
        let mut s = Stats { defense: 140, resist: 101, endurance: 400, ..Default::default() };
        s.apply_caps();
        assert_eq!((s.defense, s.resist, s.endurance), (90, 100, 400));
    }

    #[test]
    fn effectiveness_grows_with_level() {
        let crafts = Crafts { melee: 4, sorcery: -30, ..Default::default() };
        let eff = crafts.effectiveness();
        assert_eq!(eff.melee, 120);
        assert_eq!(eff.sorcery, 0);
        assert_eq!(eff.tracking, 100);
    }
}
