//! Property tests for the stat model and formulas.

use legends_core::formulas::{self, HERO_DODGE_CAP, MONSTER_DODGE_CAP, SPELL_DEBUFF, SPELL_DODGE_CAP};
use legends_core::hero::{Hero, HeroClass, HeroSpec};
use legends_core::inventory::Equipment;
use legends_core::items::{Element, Hands, Weapon};
use legends_core::monster::{CombatStats, DebuffTarget, Monster, MonsterKind};
use legends_core::testing::{sample_armor, sample_spell, sample_warrior};
use proptest::prelude::*;

fn debuff_target() -> impl Strategy<Value = DebuffTarget> {
    prop_oneof![
        Just(DebuffTarget::Defense),
        Just(DebuffTarget::Damage),
        Just(DebuffTarget::Dodge),
    ]
}

fn hands() -> impl Strategy<Value = Hands> {
    prop_oneof![Just(Hands::One), Just(Hands::Two)]
}

proptest! {
    #[test]
    fn hero_hp_never_negative(hits in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut hero = sample_warrior("Gaerdal_Ironhand");
        for hit in hits {
            hero.take_damage(hit);
            prop_assert!(hero.hp() >= 0);
            prop_assert_eq!(hero.is_fainted(), hero.hp() == 0);
        }
    }

    #[test]
    fn monster_hp_never_negative(level in 1u32..20, hits in prop::collection::vec(any::<i32>(), 0..20)) {
        let mut monster = Monster::new(MonsterKind::Spirit, "Casper", level, CombatStats::new(100, 100, 50));
        for hit in hits {
            monster.take_damage(hit);
            prop_assert!(monster.hp() >= 0);
        }
    }

    #[test]
    fn reset_undoes_every_debuff(
        damage in 0i32..5000,
        defense in 0i32..5000,
        dodge in 0i32..100,
        debuffs in prop::collection::vec((debuff_target(), -1.0f64..1.5), 0..12),
    ) {
        let stats = CombatStats::new(damage, defense, dodge);
        let mut monster = Monster::new(MonsterKind::Dragon, "Igneel", 4, stats);
        for (target, percent) in debuffs {
            let value = monster.apply_debuff(target, percent);
            prop_assert!(value >= 0);
        }
        monster.take_damage(123);
        monster.reset_for_battle();
        prop_assert_eq!(monster.live_stats(), stats);
        prop_assert_eq!(monster.hp(), monster.base_hp());
    }

    #[test]
    fn experience_never_negative(start in 0i32..100, gains in prop::collection::vec(-50i32..500, 0..10)) {
        let mut hero = Hero::new(HeroSpec { exp: start, ..HeroSpec::new("Alsvid", HeroClass::Sorcerer) });
        for gain in gains {
            hero.gain_experience(gain);
            prop_assert!(hero.exp() >= 0);
            prop_assert!(hero.exp() < hero.required_exp() || gain <= 0);
        }
    }

    #[test]
    fn two_hander_never_shares_hands(sequence in prop::collection::vec((hands(), 1i32..1000), 0..12)) {
        let mut equipment = Equipment::new();
        for (hands, damage) in sequence {
            prop_assert!(equipment.equip_weapon(Some(Weapon::new("w", 1, 1, damage, hands))));
            let main_two_handed = equipment.main_hand().is_some_and(Weapon::is_two_handed);
            if main_two_handed {
                prop_assert!(equipment.off_hand().is_none());
            }
            prop_assert!(equipment.main_hand().is_some());
        }
    }

    #[test]
    fn damage_is_at_least_one(strength in -100i32..5000, weapon in 0i32..2000, defense in 0i32..5000) {
        prop_assert!(formulas::hero_attack_damage(strength.max(0), weapon, defense) >= 1);
        prop_assert!(formulas::monster_attack_damage(weapon, defense) >= 1);
        prop_assert!(formulas::spell_damage(weapon, strength.max(0)) >= 1);
    }

    #[test]
    fn dodge_chances_respect_caps(value in any::<i32>()) {
        prop_assert!((0.0..=MONSTER_DODGE_CAP).contains(&formulas::monster_dodge_chance(value)));
        prop_assert!((0.0..=SPELL_DODGE_CAP).contains(&formulas::spell_dodge_chance(value)));
        prop_assert!((0.0..=HERO_DODGE_CAP).contains(&formulas::hero_dodge_chance(value)));
    }
}

#[test]
fn equip_two_hander_then_two_one_handers() {
    let mut equipment = Equipment::new();
    equipment.equip_weapon(Some(Weapon::new("Bow", 300, 2, 500, Hands::Two)));
    equipment.equip_weapon(Some(Weapon::new("A", 500, 1, 800, Hands::One)));
    equipment.equip_weapon(Some(Weapon::new("B", 200, 1, 250, Hands::One)));
    assert_eq!(equipment.main_hand().map(|w| w.name.as_str()), Some("A"));
    assert_eq!(equipment.off_hand().map(|w| w.name.as_str()), Some("B"));
}

#[test]
fn each_element_weakens_its_stat() {
    for element in Element::all() {
        let spell = sample_spell(element);
        let mut monster = Monster::new(MonsterKind::Exoskeleton, "Cyrrollalee", 7, CombatStats::new(700, 800, 75));
        let stat = spell.element.debuff_target();
        let before = monster.live_stats();
        monster.apply_debuff(stat, SPELL_DEBUFF);
        let after = monster.live_stats();
        match stat {
            DebuffTarget::Defense => assert_eq!((before.defense, after.defense), (800, 640)),
            DebuffTarget::Damage => assert_eq!((before.damage, after.damage), (700, 560)),
            DebuffTarget::Dodge => assert_eq!((before.dodge, after.dodge), (75, 60)),
        }
    }
}

#[test]
fn armor_halves_monster_damage_at_300() {
    let mut hero = sample_warrior("Undefeated_Yoj");
    let mut plate = sample_armor();
    plate.damage_reduction = 300;
    hero.set_armor(Some(plate));
    assert_eq!(formulas::monster_attack_damage(400, hero.armor_reduction()), 10);
}
