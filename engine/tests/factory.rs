use engine::codec::{CharacterCodec, JsonCharacterCodec};
use engine::factory::{build_character, validate_request, CreateCharacterRequest};
use engine::{Dice, ItemCategory, Race, Rulebook, Specialization, World, WorldConfig};

fn request(name: &str, race: &str, culture: &str, spec: &str) -> CreateCharacterRequest {
    CreateCharacterRequest {
        name: name.into(),
        portrait_url: "portraits/p.png".into(),
        race: race.into(),
        culture: culture.into(),
        spec: spec.into(),
    }
}

#[test]
fn new_character_gets_starting_kit() {
    let book = Rulebook::builtin().unwrap();
    let config = WorldConfig::seeded(5);
    let mut dice = Dice::from_seed(5);
    let req = request("Maren", "dwarf", "tribal", "melee");
    let c = build_character(&mut dice, &book, &config, &req).unwrap();

    assert_eq!(c.inventory.len(), 1);
    assert_eq!(c.inventory[0].category(), ItemCategory::Weapon);
    assert_eq!(c.regalia.len(), 1);
    assert!(c.regalia[0].is_trinket());
    assert_eq!(c.supplies.len(), config.debug_supply_items);
    assert_eq!(c.details.wealth, 10);
    assert_eq!(c.details.level_points, 10);
    assert!(c.details.alive);
    assert!(!c.details.locked);
    assert!(!c.details.npc);
    assert!(c.identity.player);
    assert!(c.fights.is_none());
    assert_eq!(c.details.race, Race::Dwarf);
    assert_eq!(c.details.spec, Specialization::Melee);
}

#[test]
fn choices_are_case_insensitive_and_names_trimmed() {
    let config = WorldConfig::default();
    let bp = validate_request(&request("  Ysolde ", "ELF", "Nomad", " Tracking"), &config).unwrap();
    assert_eq!(bp.name, "Ysolde");
    assert_eq!(bp.race, Race::Elf);
    assert_eq!(bp.spec, Specialization::Tracking);
}

#[test]
fn bad_requests_are_validation_errors() {
    let config = WorldConfig::default();
    let long = "x".repeat(config.max_name_len + 1);
    for req in [
        request("   ", "human", "urban", "melee"),
        request(&long, "human", "urban", "melee"),
        request("Hob", "gnome", "urban", "melee"),
        request("Hob", "human", "suburban", "melee"),
        request("Hob", "human", "urban", "bard"),
    ] {
        let err = validate_request(&req, &config).unwrap_err();
        assert!(err.is_validation(), "{:?} -> {}", req, err);
    }
}

#[test]
fn seeded_worlds_build_identical_characters() {
    let a = World::new(WorldConfig::seeded(42)).unwrap();
    let b = World::new(WorldConfig::seeded(42)).unwrap();
    let req = request("Twin", "orc", "urban", "tracking");
    assert_eq!(a.create_character(&req).unwrap(), b.create_character(&req).unwrap());
}

#[test]
fn view_requires_matching_session() {
    let world = World::new(WorldConfig::seeded(8)).unwrap();
    let c = world.create_character(&request("Odo", "human", "highborn", "melee")).unwrap();
    let other = world.create_character(&request("Pell", "human", "highborn", "melee")).unwrap();

    let view = world.character_view(c.id(), c.identity.session_id).unwrap();
    assert_eq!(view.name, "Odo");
    assert_eq!(view.actuals, c.actuals());

    let err = world.character_view(c.id(), other.identity.session_id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn exported_blob_decodes_to_same_character() {
    let world = World::new(WorldConfig::seeded(13)).unwrap();
    let c = world.create_character(&request("Wren", "elf", "nomad", "tracking")).unwrap();
    let blob = world.export_character(c.identity_pair(), &JsonCharacterCodec).unwrap();
    let back = JsonCharacterCodec.decode(&blob).unwrap();
    assert_eq!(back, c);
    assert!(JsonCharacterCodec.decode("not json").is_err());
}

#[test]
fn concurrent_creates_all_land() {
    let world = World::new(WorldConfig::seeded(21)).unwrap();
    std::thread::scope(|s| {
        for t in 0..4 {
            let world = &world;
            s.spawn(move || {
                for i in 0..5 {
                    let name = format!("T{}-{}", t, i);
                    world.create_character(&request(&name, "human", "urban", "melee")).unwrap();
                }
            });
        }
    });
    assert_eq!(world.character_count(), 20);
}
