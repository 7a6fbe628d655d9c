use tracing::debug;

use crate::content::Rulebook;
use crate::model::{
    Character, CharacterId, Culture, Details, EffortLevel, Identity, Race, SessionId,
    Specialization,
};
use crate::stats::{Actuals, Crafts, Stats};
use crate::Dice;

const RACES: [Race; 4] = [Race::Human, Race::Elf, Race::Dwarf, Race::Orc];
const CULTURES: [Culture; 4] = [Culture::Highborn, Culture::Nomad, Culture::Tribal, Culture::Urban];
const SPECS: [Specialization; 3] =
    [Specialization::Melee, Specialization::Tracking, Specialization::Sorcery];

/// Uniform roll in `[v/2, v + v/2]`.
pub fn band(dice: &mut Dice, value: i32) -> i32 {
    dice.roll_between(value / 2, value + value / 2)
}

/// Roll an opponent's actuals from a target's, field by field, then re-cap.
pub fn generate_opponent(dice: &mut Dice, target: &Actuals) -> Actuals {
    let mut stats = target.stats.map(|_, v| band(dice, v));
    stats.apply_caps();
    let crafts = target.crafts.map(|_, v| band(dice, v));
    let effectiveness = target.effectiveness.map(|_, v| band(dice, v));
    Actuals { stats, crafts, effectiveness }
}

/// Scale every field by `pct` percent and re-apply the caps.
pub fn scale(actuals: &Actuals, pct: i32) -> Actuals {
    let pct_of = |v: i32| v * pct / 100;
    let mut stats: Stats = actuals.stats.map(|_, v| pct_of(v));
    stats.apply_caps();
    let crafts: Crafts = actuals.crafts.map(|_, v| pct_of(v));
    let effectiveness: Crafts = actuals.effectiveness.map(|_, v| pct_of(v));
    Actuals { stats, crafts, effectiveness }
}

/// Build a locked NPC character tuned against `target`.
pub fn spawn_npc(
    dice: &mut Dice,
    book: &Rulebook,
    target: &Actuals,
    effort: EffortLevel,
) -> Character {
    let banded = generate_opponent(dice, target);
    let actuals = scale(&banded, effort.opponent_scale_pct());

    let race = dice.pick(&RACES).copied().unwrap_or(Race::Human);
    let culture = dice.pick(&CULTURES).copied().unwrap_or(Culture::Urban);
    let spec = dice.pick(&SPECS).copied().unwrap_or(Specialization::Melee);
    let name = dice.pick(&book.npc_names).cloned().unwrap_or_else(|| "Stranger".to_string());

    let identity = Identity {
        id: CharacterId(dice.uuid()),
        session_id: SessionId(dice.uuid()),
        player: false,
    };
    debug!(
        npc = %name,
        %race,
        %spec,
        %effort,
        endurance = actuals.stats.endurance,
        "spawned opponent"
    );

    Character {
        identity,
        details: Details {
            name,
            portrait_url: format!("portraits/npc-{}.png", race),
            race,
            culture,
            spec,
            alive: true,
            locked: true,
            hidden: false,
            npc: true,
            wealth: 0,
            renown: 0,
            level_points: 0,
            board: None,
        },
        stats: actuals.stats,
        crafts: actuals.crafts,
        inventory: Vec::new(),
        regalia: Vec::new(),
        supplies: Vec::new(),
        fights: Some(actuals),
    }
}
