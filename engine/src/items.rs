//! Procedural loot.
//!
//! Every decision is a `roll_range` on the shared dice, so a seeded world
//! produces the same items in the same order.

use tracing::debug;

use crate::content::Rulebook;
use crate::model::{Item, ItemCategory, ItemId, ItemKind};
use crate::stats::{CraftKind, Crafts, StatKind, Stats};
use crate::Dice;

/// Trinkets become permanent at or above this tier roll. Tier rolls are a
/// d20, so no trinket currently qualifies.
pub const PERMANENCE_THRESHOLD: i32 = 60;

/// Category ladder over a d20: 1–8 weapon, 9–14 shield, 15–18 trinket,
/// 19–20 armour.
pub fn category_from_roll(roll: i32) -> ItemCategory {
    match roll {
        ..=8 => ItemCategory::Weapon,
        9..=14 => ItemCategory::Shield,
        15..=18 => ItemCategory::Trinket,
        _ => ItemCategory::Armour,
    }
}

pub fn roll_category(dice: &mut Dice) -> ItemCategory {
    category_from_roll(dice.d20())
}

/// Tier 2 only on a natural 20.
pub fn tier_from_roll(roll: i32) -> i32 {
    1 + roll / 20
}

pub fn permanence_from_roll(roll: i32) -> bool {
    roll >= PERMANENCE_THRESHOLD
}

pub fn icon_for(category: ItemCategory, tainted: bool) -> String {
    if tainted {
        format!("icons/{}-tainted.png", category)
    } else {
        format!("icons/{}.png", category)
    }
}

/// Skill an untainted item of this category trains.
fn category_skill(category: ItemCategory) -> CraftKind {
    match category {
        ItemCategory::Weapon => CraftKind::Melee,
        ItemCategory::Shield => CraftKind::Smithing,
        ItemCategory::Armour => CraftKind::Leatherwork,
        ItemCategory::Trinket => CraftKind::Enchanting,
    }
}

fn apply_category_bonus(category: ItemCategory, stats: &mut Stats) {
    match category {
        ItemCategory::Weapon => {
            stats.combat += 1;
            stats.might += 1;
        }
        ItemCategory::Shield => {
            stats.defense += 1;
            stats.vigor += 1;
        }
        ItemCategory::Armour => {
            stats.defense += 2;
            stats.endurance += 1;
        }
        ItemCategory::Trinket => {
            stats.abstract_ += 1;
            stats.presence += 1;
        }
    }
}

/// Generate one item, rolling the category when none is requested.
pub fn generate_item(dice: &mut Dice, book: &Rulebook, category: Option<ItemCategory>) -> Item {
    let category = category.unwrap_or_else(|| roll_category(dice));
    let tainted = dice.roll_range(2) % 2 == 0;
    let tier_roll = dice.d20();
    let tier = tier_from_roll(tier_roll);

    let kind = match category {
        ItemCategory::Weapon => ItemKind::Weapon,
        ItemCategory::Shield => ItemKind::Shield,
        ItemCategory::Armour => ItemKind::Armour,
        ItemCategory::Trinket => ItemKind::Trinket { permanent: permanence_from_roll(tier_roll) },
    };

    let name = dice
        .pick(book.item_names(category))
        .cloned()
        .unwrap_or_else(|| category.to_string());

    let mut stats = Stats::default();
    let mut crafts = Crafts::default();

    let stat_rounds = dice.roll_range(5 + tier);
    for _ in 0..stat_rounds {
        apply_category_bonus(category, &mut stats);
        if tainted {
            stats.arcane += 1;
            stats.accretion += 1;
            stats.resist -= 1;
        } else {
            *crafts.get_mut(category_skill(category)) += 1;
            stats.resist += 1;
        }
        if let Some(asset) = dice.pick(&StatKind::ASSETS) {
            *stats.get_mut(*asset) += 1;
        }
    }

    let skill_rounds = dice.roll_range(5 + tier);
    for _ in 0..skill_rounds {
        if let Some(skill) = dice.pick(&CraftKind::ITEM_SKILLS) {
            *crafts.get_mut(*skill) += 1;
        }
    }

    let value = if tainted {
        dice.roll_range(10) * tier
    } else {
        (dice.roll_range(20) + 10) * tier
    };

    let item = Item {
        id: ItemId(dice.uuid()),
        kind,
        name,
        icon: icon_for(category, tainted),
        tainted,
        tier,
        stats,
        crafts,
        value,
    };
    debug!(item = %item.name, %category, tier, tainted, value, "generated item");
    item
}
