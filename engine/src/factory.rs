use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WorldConfig;
use crate::content::Rulebook;
use crate::error::{ensure, GameResult};
use crate::items::generate_item;
use crate::model::{
    parse_choice, Character, CharacterId, Culture, Details, Identity, ItemCategory, Race,
    SessionId, Specialization,
};
use crate::stats::{Crafts, Stats};
use crate::Dice;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateCharacterRequest {
    pub name: String,
    pub portrait_url: String,
    pub race: String,
    pub culture: String,
    pub spec: String,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterBlueprint {
    pub name: String,
    pub portrait_url: String,
    pub race: Race,
    pub culture: Culture,
    pub spec: Specialization,
}

pub fn validate_request(
    request: &CreateCharacterRequest,
    config: &WorldConfig,
) -> GameResult<CharacterBlueprint> {
    let name = request.name.trim();
    ensure(!name.is_empty(), || "character name must not be empty".to_string())?;
    ensure(name.chars().count() <= config.max_name_len, || {
        format!("character name must be at most {} characters", config.max_name_len)
    })?;
    let portrait_url = request.portrait_url.trim();
    ensure(!portrait_url.is_empty(), || "portrait url must not be empty".to_string())?;

    Ok(CharacterBlueprint {
        name: name.to_string(),
        portrait_url: portrait_url.to_string(),
        race: parse_choice("race", &request.race)?,
        culture: parse_choice("culture", &request.culture)?,
        spec: parse_choice("specialization", &request.spec)?,
    })
}

/// Race sets the baseline; culture then spec add on top.
pub fn base_attributes(
    book: &Rulebook,
    race: Race,
    culture: Culture,
    spec: Specialization,
) -> GameResult<(Stats, Crafts)> {
    let race = book.race(race)?;
    let culture = book.culture(culture)?;
    let spec = book.specialization(spec)?;

    let mut stats = race.stats;
    stats += &culture.stats;
    stats += &spec.stats;

    let mut crafts = race.crafts;
    crafts += &culture.crafts;
    crafts += &spec.crafts;

    Ok((stats, crafts))
}

/// Validate and assemble a fresh character with its starting kit.
pub fn build_character(
    dice: &mut Dice,
    book: &Rulebook,
    config: &WorldConfig,
    request: &CreateCharacterRequest,
) -> GameResult<Character> {
    let blueprint = validate_request(request, config)?;
    let (stats, crafts) = base_attributes(book, blueprint.race, blueprint.culture, blueprint.spec)?;

    let identity = Identity {
        id: CharacterId(dice.uuid()),
        session_id: SessionId(dice.uuid()),
        player: true,
    };

    let weapon = generate_item(dice, book, Some(ItemCategory::Weapon));
    let trinket = generate_item(dice, book, Some(ItemCategory::Trinket));
    // TODO: drop the free supplies once loot drops from duels exist.
    let supplies = (0..config.debug_supply_items)
        .map(|_| generate_item(dice, book, None))
        .collect();

    let character = Character {
        identity,
        details: Details {
            name: blueprint.name,
            portrait_url: blueprint.portrait_url,
            race: blueprint.race,
            culture: blueprint.culture,
            spec: blueprint.spec,
            alive: true,
            locked: false,
            hidden: false,
            npc: false,
            wealth: config.starting_wealth,
            renown: 0,
            level_points: config.starting_level_points,
            board: None,
        },
        stats,
        crafts,
        inventory: vec![weapon],
        regalia: vec![trinket],
        supplies,
        fights: None,
    };
    info!(
        character = %character.id(),
        name = %character.name(),
        race = %blueprint.race,
        culture = %blueprint.culture,
        spec = %blueprint.spec,
        "character created"
    );
    Ok(character)
}
