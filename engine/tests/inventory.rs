use engine::factory::{build_character, CreateCharacterRequest};
use engine::inventory::{self, EquipItemRequest, LevelUpRequest};
use engine::items::generate_item;
use engine::model::{INVENTORY_CAP, REGALIA_CAP};
use engine::{Character, Dice, ItemCategory, ItemId, Rulebook, World, WorldConfig};

fn request(name: &str) -> CreateCharacterRequest {
    CreateCharacterRequest {
        name: name.into(),
        portrait_url: "portraits/p.png".into(),
        race: "human".into(),
        culture: "urban".into(),
        spec: "melee".into(),
    }
}

/// A character with nothing equipped and nothing in supplies.
fn empty_handed(dice: &mut Dice, book: &Rulebook) -> Character {
    let config = WorldConfig { debug_supply_items: 0, ..WorldConfig::default() };
    let mut c = build_character(dice, book, &config, &request("Tamsin")).unwrap();
    c.inventory.clear();
    c.regalia.clear();
    c
}

fn stock(dice: &mut Dice, book: &Rulebook, c: &mut Character, category: ItemCategory) -> ItemId {
    let item = generate_item(dice, book, Some(category));
    let id = item.id;
    c.supplies.push(item);
    id
}

#[test]
fn full_inventory_rejects_another_item() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_seed(1);
    let mut c = empty_handed(&mut dice, &book);
    for category in [
        ItemCategory::Weapon,
        ItemCategory::Weapon,
        ItemCategory::Shield,
        ItemCategory::Armour,
    ] {
        let id = stock(&mut dice, &book, &mut c, category);
        inventory::equip(&mut c, id).unwrap();
    }
    assert_eq!(c.inventory.len(), INVENTORY_CAP);

    let extra = stock(&mut dice, &book, &mut c, ItemCategory::Weapon);
    let err = inventory::equip(&mut c, extra).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(c.inventory.len(), INVENTORY_CAP);
    assert!(c.supplies.iter().any(|i| i.id == extra));
}

#[test]
fn category_limits_apply_before_the_cap() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_seed(2);
    let mut c = empty_handed(&mut dice, &book);
    let first = stock(&mut dice, &book, &mut c, ItemCategory::Armour);
    inventory::equip(&mut c, first).unwrap();
    let second = stock(&mut dice, &book, &mut c, ItemCategory::Armour);
    let err = inventory::equip(&mut c, second).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(c.inventory.len(), 1);
}

#[test]
fn eleventh_trinket_is_refused() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_seed(3);
    let mut c = empty_handed(&mut dice, &book);
    for _ in 0..REGALIA_CAP {
        let id = stock(&mut dice, &book, &mut c, ItemCategory::Trinket);
        inventory::equip(&mut c, id).unwrap();
    }
    let extra = stock(&mut dice, &book, &mut c, ItemCategory::Trinket);
    assert!(inventory::equip(&mut c, extra).unwrap_err().is_validation());
    assert_eq!(c.regalia.len(), REGALIA_CAP);
    assert!(c.inventory.is_empty());
}

#[test]
fn unequip_returns_item_to_supplies() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_seed(4);
    let mut c = empty_handed(&mut dice, &book);
    let id = stock(&mut dice, &book, &mut c, ItemCategory::Shield);
    inventory::equip(&mut c, id).unwrap();
    inventory::unequip(&mut c, id).unwrap();
    assert!(c.inventory.is_empty());
    assert_eq!(c.supplies.len(), 1);
    assert!(inventory::unequip(&mut c, id).unwrap_err().is_validation());
}

#[test]
fn selling_twice_fails_the_second_time() {
    let world = World::new(WorldConfig::seeded(10)).unwrap();
    let c = world.create_character(&request("Merrow")).unwrap();
    let item = c.supplies[0].clone();
    let req = EquipItemRequest { identity: c.identity_pair(), item_id: item.id };

    let view = world.sell_item(&req).unwrap();
    assert_eq!(view.wealth, c.details.wealth + item.value);
    assert_eq!(view.supplies.len(), c.supplies.len() - 1);

    let err = world.sell_item(&req).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("already sold"), "{}", err);
}

#[test]
fn equipped_items_cannot_be_sold() {
    let world = World::new(WorldConfig::seeded(11)).unwrap();
    let c = world.create_character(&request("Jory")).unwrap();
    let req = EquipItemRequest { identity: c.identity_pair(), item_id: c.inventory[0].id };
    assert!(world.sell_item(&req).unwrap_err().is_validation());
}

#[test]
fn world_equip_checks_session() {
    let world = World::new(WorldConfig::seeded(12)).unwrap();
    let c = world.create_character(&request("Ansel")).unwrap();
    let intruder = world.create_character(&request("Cask")).unwrap();
    let mut identity = c.identity_pair();
    identity.session_id = intruder.identity.session_id;
    let req = EquipItemRequest { identity, item_id: c.supplies[0].id };
    assert!(world.equip_item(&req).unwrap_err().is_not_found());
}

#[test]
fn level_up_raises_base_and_spends_points() {
    let world = World::new(WorldConfig::seeded(14)).unwrap();
    let c = world.create_character(&request("Rook")).unwrap();
    let identity = c.identity_pair();

    let view = world
        .level_up(&LevelUpRequest { identity, attribute: "Might".into(), points: 3 })
        .unwrap();
    assert_eq!(view.stats.might, c.stats.might + 3);
    assert_eq!(view.level_points, 7);

    let view = world
        .level_up(&LevelUpRequest { identity, attribute: "leadership".into(), points: 2 })
        .unwrap();
    assert_eq!(view.crafts.leadership, c.crafts.leadership + 2);
    assert_eq!(view.level_points, 5);

    for (attribute, points) in [("might", 0), ("might", 6), ("charm", 1)] {
        let err = world
            .level_up(&LevelUpRequest { identity, attribute: attribute.into(), points })
            .unwrap_err();
        assert!(err.is_validation(), "{} {}", attribute, points);
    }
    assert_eq!(world.character_view(c.id(), identity.session_id).unwrap().level_points, 5);
}

#[test]
fn gear_is_frozen_during_a_duel() {
    let world = World::new(WorldConfig::seeded(15)).unwrap();
    let c = world.create_character(&request("Hale")).unwrap();
    world.start_duel(c.identity_pair(), "casual").unwrap();
    let req = EquipItemRequest { identity: c.identity_pair(), item_id: c.supplies[0].id };
    assert!(world.equip_item(&req).unwrap_err().is_validation());
    assert!(world.sell_item(&req).unwrap_err().is_validation());
}
