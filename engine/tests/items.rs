use engine::items::{generate_item, icon_for, permanence_from_roll, PERMANENCE_THRESHOLD};
use engine::{CraftKind, Dice, ItemCategory, ItemKind, Rulebook, StatKind};
use proptest::prelude::*;

#[test]
fn all_ones_script_gives_plain_trinket() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_scripted(vec![1]);
    let item = generate_item(&mut dice, &book, Some(ItemCategory::Trinket));

    assert_eq!(item.kind, ItemKind::Trinket { permanent: false });
    assert_eq!(item.name, "Amber Charm");
    assert!(!item.tainted);
    assert_eq!(item.tier, 1);
    assert_eq!(item.icon, "icons/trinket.png");
    // one stat round, one skill round, value (1 + 10) * tier
    assert_eq!(item.stats.abstract_, 1);
    assert_eq!(item.stats.presence, 1);
    assert_eq!(item.stats.resist, 1);
    assert_eq!(item.stats.defense, 1);
    assert_eq!(item.crafts.get(CraftKind::Enchanting), 1);
    assert_eq!(item.crafts.get(CraftKind::Melee), 1);
    assert_eq!(item.value, 11);
}

#[test]
fn natural_twenty_gives_tier_two_tainted_item() {
    let book = Rulebook::builtin().unwrap();
    let mut dice = Dice::from_scripted(vec![20]);
    let item = generate_item(&mut dice, &book, Some(ItemCategory::Weapon));

    assert!(item.tainted);
    assert_eq!(item.tier, 2);
    assert_eq!(item.icon, "icons/weapon-tainted.png");
    // seven stat rounds of weapon bonus plus taint
    assert_eq!(item.stats.combat, 7);
    assert_eq!(item.stats.arcane, 7);
    assert_eq!(item.stats.resist, -7);
    assert_eq!(item.value, 10 * 2);
}

#[test]
fn permanence_needs_a_tier_roll_no_d20_reaches() {
    assert!(PERMANENCE_THRESHOLD > 20);
    assert!(!permanence_from_roll(20));
    assert!(permanence_from_roll(PERMANENCE_THRESHOLD));
}

#[test]
fn icon_paths() {
    insta::assert_snapshot!(icon_for(ItemCategory::Armour, true), @"icons/armour-tainted.png");
}

proptest! {
    #[test]
    fn generated_items_are_well_formed(seed in any::<u64>()) {
        let book = Rulebook::builtin().unwrap();
        let mut dice = Dice::from_seed(seed);
        let item = generate_item(&mut dice, &book, None);

        prop_assert!(matches!(
            item.category(),
            ItemCategory::Weapon
                | ItemCategory::Shield
                | ItemCategory::Armour
                | ItemCategory::Trinket
        ));
        prop_assert!(item.tier >= 1 && item.tier <= 2);
        prop_assert!(item.value >= 1);
        prop_assert!(book.item_names(item.category()).contains(&item.name));
        prop_assert_eq!(&item.icon, &icon_for(item.category(), item.tainted));
        if let ItemKind::Trinket { permanent } = item.kind {
            prop_assert!(!permanent);
        }
        prop_assert_eq!(item.crafts.get(CraftKind::Leadership), 0);
        if item.tainted {
            prop_assert!(item.stats.get(StatKind::Arcane) >= 1);
        }
    }
}
