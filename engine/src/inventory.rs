//! Gear and level-up operations on a single character.
//!
//! Each function validates first and only then moves items, so a rejected
//! call never leaves an item half-moved.

use serde::{Deserialize, Serialize};

use crate::error::{ensure, GameError, GameResult};
use crate::model::{
    Character, CharacterIdentity, Item, ItemId, SessionId, INVENTORY_CAP, REGALIA_CAP,
};
use crate::stats::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipItemRequest {
    pub identity: CharacterIdentity,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpRequest {
    pub identity: CharacterIdentity,
    pub attribute: String,
    pub points: i32,
}

/// The character belongs to `session`.
pub fn ensure_owner(character: &Character, session: SessionId) -> GameResult<()> {
    if character.owns(session) {
        Ok(())
    } else {
        Err(GameError::not_found(format!("character {}", character.id())))
    }
}

/// Alive and not committed to a board.
pub fn ensure_free(character: &Character) -> GameResult<()> {
    ensure(character.details.alive, || format!("{} is dead", character.name()))?;
    ensure(!character.details.locked, || format!("{} is locked", character.name()))?;
    ensure(!character.on_board(), || format!("{} is on a board", character.name()))
}

fn position(items: &[Item], item_id: ItemId) -> Option<usize> {
    items.iter().position(|i| i.id == item_id)
}

/// Check that `item` could be equipped right now.
pub fn check_equip(character: &Character, item: &Item) -> GameResult<()> {
    if item.is_trinket() {
        return ensure(character.regalia.len() < REGALIA_CAP, || {
            format!("regalia is full ({} trinkets)", REGALIA_CAP)
        });
    }
    ensure(character.inventory.len() < INVENTORY_CAP, || {
        format!("inventory is full ({} items)", INVENTORY_CAP)
    })?;
    let category = item.category();
    if let Some(limit) = category.inventory_limit() {
        ensure(character.equipped_count(category) < limit, || {
            format!("cannot equip more than {} {} item(s)", limit, category)
        })?;
    }
    Ok(())
}

/// Move an item from supplies into the inventory (or regalia for trinkets).
pub fn equip(character: &mut Character, item_id: ItemId) -> GameResult<()> {
    ensure_free(character)?;
    let idx = position(&character.supplies, item_id)
        .ok_or_else(|| GameError::validation(format!("item {} is not in supplies", item_id)))?;
    check_equip(character, &character.supplies[idx])?;

    let item = character.supplies.remove(idx);
    if item.is_trinket() {
        character.regalia.push(item);
    } else {
        character.inventory.push(item);
    }
    Ok(())
}

/// Move an equipped item back into supplies.
pub fn unequip(character: &mut Character, item_id: ItemId) -> GameResult<()> {
    ensure_free(character)?;
    let item = if let Some(idx) = position(&character.inventory, item_id) {
        character.inventory.remove(idx)
    } else if let Some(idx) = position(&character.regalia, item_id) {
        character.regalia.remove(idx)
    } else {
        return Err(GameError::validation(format!("item {} is not equipped", item_id)));
    };
    character.supplies.push(item);
    Ok(())
}

/// Remove an item from supplies and credit its value. The caller owns the
/// sold-item ledger.
pub fn sell(character: &mut Character, item_id: ItemId) -> GameResult<Item> {
    ensure_free(character)?;
    let idx = position(&character.supplies, item_id)
        .ok_or_else(|| GameError::validation(format!("item {} is not in supplies", item_id)))?;
    let item = character.supplies.remove(idx);
    character.details.wealth += item.value;
    Ok(item)
}

/// Spend level-up points on one base attribute.
pub fn level_up(character: &mut Character, attribute: Attribute, points: i32) -> GameResult<()> {
    ensure_free(character)?;
    ensure(points >= 1, || "must spend at least one point".to_string())?;
    ensure(points <= character.details.level_points, || {
        format!(
            "not enough level-up points ({} requested, {} available)",
            points, character.details.level_points
        )
    })?;
    *attribute.get_mut(&mut character.stats, &mut character.crafts) += points;
    character.details.level_points -= points;
    Ok(())
}
