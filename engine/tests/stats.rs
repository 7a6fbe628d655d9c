use engine::factory::{base_attributes, build_character, CreateCharacterRequest};
use engine::items::generate_item;
use engine::stats::{DEFENSE_CAP, RESIST_CAP};
use engine::{
    compute_actuals, Character, CraftKind, Culture, Dice, ItemCategory, Race, Rulebook,
    Specialization, StatKind, WorldConfig,
};
use proptest::prelude::*;

fn book() -> Rulebook {
    Rulebook::builtin().expect("built-in rulebook")
}

fn bare_character(dice: &mut Dice, book: &Rulebook) -> Character {
    let config = WorldConfig { debug_supply_items: 0, ..WorldConfig::seeded(1) };
    let request = CreateCharacterRequest {
        name: "Iseult".into(),
        portrait_url: "portraits/iseult.png".into(),
        race: "elf".into(),
        culture: "highborn".into(),
        spec: "sorcery".into(),
    };
    build_character(dice, book, &config, &request).expect("valid character")
}

#[test]
fn elf_highborn_sorcerer_sums_all_three_rows() {
    let book = book();
    let (stats, _) =
        base_attributes(&book, Race::Elf, Culture::Highborn, Specialization::Sorcery).unwrap();
    let expected = book.race(Race::Elf).unwrap().stats.abstract_
        + book.culture(Culture::Highborn).unwrap().stats.abstract_
        + book.specialization(Specialization::Sorcery).unwrap().stats.abstract_;
    assert_eq!(stats.abstract_, expected);
    assert_eq!(stats.abstract_, 12);
}

#[test]
fn crafts_sum_across_rows_too() {
    let book = book();
    let (_, crafts) =
        base_attributes(&book, Race::Elf, Culture::Highborn, Specialization::Sorcery).unwrap();
    assert_eq!(crafts.get(CraftKind::Enchanting), 3);
    assert_eq!(crafts.get(CraftKind::Sorcery), 3);
    assert_eq!(crafts.get(CraftKind::Leadership), 2);
}

#[test]
fn supplies_do_not_count_toward_actuals() {
    let book = book();
    let mut dice = Dice::from_seed(9);
    let mut c = bare_character(&mut dice, &book);
    let before = compute_actuals(&c);
    let armour = generate_item(&mut dice, &book, Some(ItemCategory::Armour));
    c.supplies.push(armour.clone());
    assert_eq!(compute_actuals(&c), before);

    c.supplies.clear();
    c.inventory.push(armour.clone());
    let after = compute_actuals(&c);
    assert_eq!(
        after.stats.endurance,
        before.stats.endurance + armour.stats.endurance
    );
}

#[test]
fn effectiveness_tracks_craft_levels() {
    let book = book();
    let mut dice = Dice::from_seed(2);
    let c = bare_character(&mut dice, &book);
    let actuals = c.actuals();
    for kind in CraftKind::ITEM_SKILLS {
        assert_eq!(
            actuals.effectiveness_of(kind),
            (100 + 5 * actuals.crafts.get(kind)).max(0)
        );
    }
}

proptest! {
    #[test]
    fn actuals_are_deterministic_and_capped(
        seed in any::<u64>(),
        defense in -50i32..400,
        resist in -50i32..400,
        gear in 0usize..4,
    ) {
        let book = book();
        let mut dice = Dice::from_seed(seed);
        let mut c = bare_character(&mut dice, &book);
        c.stats.defense = defense;
        c.stats.resist = resist;
        c.inventory.clear();
        for _ in 0..gear {
            c.inventory.push(generate_item(&mut dice, &book, Some(ItemCategory::Shield)));
        }

        let a = compute_actuals(&c);
        prop_assert_eq!(a, compute_actuals(&c));
        prop_assert!(a.stats.defense <= DEFENSE_CAP);
        prop_assert!(a.stats.resist <= RESIST_CAP);
        for kind in StatKind::ASSETS {
            if kind != StatKind::Defense && kind != StatKind::Resist {
                let equipped: i32 = c
                    .inventory
                    .iter()
                    .chain(&c.regalia)
                    .map(|i| i.stats.get(kind))
                    .sum();
                prop_assert_eq!(a.stats.get(kind), c.stats.get(kind) + equipped);
            }
        }
    }
}
