//! Damage, dodge and effect formulas.
//!
//! Everything here is a pure function of the numbers passed in. The only
//! randomness is [`roll_dodge`], which takes the caller's RNG so a seeded
//! battle stays reproducible.
//!
//! # Formulas
//!
//! ```text
//! hero -> monster:   max(1, round((strength + weapon) * 0.05 / (1 + defense / 300)))
//! monster -> hero:   max(1, round(damage * 0.05 / (1 + armor / 300)))
//! spell:             max(1, round(spell_damage * (1 + dexterity / 10000)))
//! ```
//!
//! Rounding is always round-half-up.

use crate::items::Attribute;
use rand::Rng;

/// Scale applied to raw physical damage before defense.
pub const PHYSICAL_SCALE: f64 = 0.05;

/// Defense (or armor) points that double the damage divisor.
pub const DEFENSE_DIVISOR: f64 = 300.0;

/// Dexterity points that double a spell's damage.
pub const SPELL_DEXTERITY_DIVISOR: f64 = 10_000.0;

/// Every connecting hit deals at least this much.
pub const MIN_DAMAGE: i32 = 1;

/// Upper bound on a monster's chance to dodge a physical attack.
pub const MONSTER_DODGE_CAP: f64 = 0.40;

/// Upper bound on a hero's chance to dodge a monster attack.
pub const HERO_DODGE_CAP: f64 = 0.50;

/// Dodge chance granted per point of hero agility.
pub const HERO_DODGE_PER_AGILITY: f64 = 0.0005;

/// Upper bound on a monster's chance to dodge a spell.
pub const SPELL_DODGE_CAP: f64 = 0.30;

/// Spells are half as easy to dodge as weapons.
pub const SPELL_DODGE_FACTOR: f64 = 0.5;

/// Fraction removed from a monster stat by an elemental spell.
pub const SPELL_DEBUFF: f64 = 0.20;

/// Per-round HP/MP regeneration multiplier.
pub const REGEN_RATE: f64 = 1.1;

/// Base HP/MP multiplier applied on level-up.
pub const LEVEL_UP_POOL_GROWTH: f64 = 1.1;

/// Experience needed per current level to reach the next one.
pub const EXP_PER_LEVEL: i32 = 10;

/// Gold granted per level of the strongest defeated monster.
pub const GOLD_PER_MONSTER_LEVEL: i32 = 100;

/// Round half up, the way every stat in the game is rounded.
///
/// Stat values are never negative when rounded, so this agrees with
/// "round half away from zero" for all inputs that occur in practice.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Damage a hero's weapon attack deals to a monster with `defense`.
pub fn hero_attack_damage(strength: i32, weapon_damage: i32, defense: i32) -> i32 {
    let base = f64::from(strength.saturating_add(weapon_damage)) * PHYSICAL_SCALE;
    let defense_factor = 1.0 + f64::from(defense.max(0)) / DEFENSE_DIVISOR;
    round_half_up(base / defense_factor).max(MIN_DAMAGE)
}

/// Damage a monster's attack deals to a hero wearing `armor_reduction`.
pub fn monster_attack_damage(base_damage: i32, armor_reduction: i32) -> i32 {
    let raw = f64::from(base_damage) * PHYSICAL_SCALE;
    let defense_factor = 1.0 + f64::from(armor_reduction.max(0)) / DEFENSE_DIVISOR;
    round_half_up(raw / defense_factor).max(MIN_DAMAGE)
}

/// Damage of a spell cast by a hero with `dexterity`.
pub fn spell_damage(spell_damage: i32, dexterity: i32) -> i32 {
    let factor = 1.0 + f64::from(dexterity) / SPELL_DEXTERITY_DIVISOR;
    round_half_up(f64::from(spell_damage) * factor).max(MIN_DAMAGE)
}

/// Chance that a monster with `dodge` (percent) avoids a weapon attack.
pub fn monster_dodge_chance(dodge: i32) -> f64 {
    (f64::from(dodge.max(0)) / 100.0).min(MONSTER_DODGE_CAP)
}

/// Chance that a monster with `dodge` (percent) avoids a spell.
pub fn spell_dodge_chance(dodge: i32) -> f64 {
    (f64::from(dodge.max(0)) / 100.0 * SPELL_DODGE_FACTOR).min(SPELL_DODGE_CAP)
}

/// Chance that a hero with `agility` avoids a monster attack.
pub fn hero_dodge_chance(agility: i32) -> f64 {
    (f64::from(agility.max(0)) * HERO_DODGE_PER_AGILITY).min(HERO_DODGE_CAP)
}

/// One uniform draw in `[0, 1)`; the attack misses when the draw is below `chance`.
pub fn roll_dodge<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

/// Reduce `value` by `percent`, clamping at zero. No-op for `percent <= 0`.
pub fn debuffed(value: i32, percent: f64) -> i32 {
    if percent <= 0.0 {
        return value;
    }
    round_half_up(f64::from(value) * (1.0 - percent)).max(0)
}

/// Hero attributes a potion raises, from its free-text attribute field.
///
/// Matching is a case-insensitive substring test, so `"Health/Mana"` raises
/// both pools. The exact value `"all"` raises every attribute. An empty
/// result means the potion has no recognised effect.
pub fn potion_targets(attribute: &str) -> Vec<Attribute> {
    let lower = attribute.trim().to_lowercase();
    if lower == "all" {
        return Attribute::ALL.to_vec();
    }

    Attribute::ALL
        .into_iter()
        .filter(|attr| attr.keywords().iter().any(|kw| lower.contains(kw)))
        .collect()
}

/// Experience needed to advance from `level` to the next level.
pub fn required_exp(level: u32) -> i32 {
    (level as i32).saturating_mul(EXP_PER_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(110.00000000000001), 110);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_hero_attack_against_heavy_defense() {
        // (100 + 50) * 0.05 = 7.5, factor 2.0 -> 3.75 -> 4
        assert_eq!(hero_attack_damage(100, 50, 300), 4);
    }

    #[test]
    fn test_hero_attack_without_defense() {
        assert_eq!(hero_attack_damage(700, 300, 0), 50);
    }

    #[test]
    fn test_hero_attack_with_maxed_strength() {
        // Strength can be raised without bound by potions.
        let damage = hero_attack_damage(i32::MAX, 800, 0);
        assert_eq!(damage, hero_attack_damage(i32::MAX, 0, 0));
        assert!(damage > 100_000_000);
    }

    #[test]
    fn test_damage_floor_is_one() {
        assert_eq!(hero_attack_damage(0, 0, 900), 1);
        assert_eq!(monster_attack_damage(0, 0), 1);
        assert_eq!(spell_damage(0, 0), 1);
    }

    #[test]
    fn test_monster_attack_reduced_by_armor() {
        // 400 * 0.05 = 20, armor 300 halves it.
        assert_eq!(monster_attack_damage(400, 0), 20);
        assert_eq!(monster_attack_damage(400, 300), 10);
        assert_eq!(monster_attack_damage(400, 600), 7);
    }

    #[test]
    fn test_spell_damage_scales_with_dexterity() {
        assert_eq!(spell_damage(500, 0), 500);
        assert_eq!(spell_damage(500, 700), 535);
        assert_eq!(spell_damage(800, 10_000), 1600);
    }

    #[test]
    fn test_dodge_chances_are_capped() {
        assert_eq!(monster_dodge_chance(999), MONSTER_DODGE_CAP);
        assert!((monster_dodge_chance(25) - 0.25).abs() < 1e-12);
        assert_eq!(spell_dodge_chance(999), SPELL_DODGE_CAP);
        assert!((spell_dodge_chance(40) - 0.20).abs() < 1e-12);
        assert_eq!(hero_dodge_chance(5000), HERO_DODGE_CAP);
        assert!((hero_dodge_chance(700) - 0.35).abs() < 1e-12);
        assert_eq!(hero_dodge_chance(-10), 0.0);
    }

    #[test]
    fn test_roll_dodge_uses_strict_threshold() {
        // StepRng(0, 0) always draws exactly 0.0.
        let mut rng = StepRng::new(0, 0);
        assert!(roll_dodge(&mut rng, 0.1));
        assert!(!roll_dodge(&mut rng, 0.0));
    }

    #[test]
    fn test_debuffed() {
        assert_eq!(debuffed(300, SPELL_DEBUFF), 240);
        assert_eq!(debuffed(3, SPELL_DEBUFF), 2);
        assert_eq!(debuffed(0, SPELL_DEBUFF), 0);
        assert_eq!(debuffed(50, 0.0), 50);
        assert_eq!(debuffed(50, -0.5), 50);
        assert_eq!(debuffed(50, 1.0), 0);
    }

    #[test]
    fn test_potion_targets() {
        assert_eq!(potion_targets("Health"), vec![Attribute::Health]);
        assert_eq!(potion_targets("HP"), vec![Attribute::Health]);
        assert_eq!(potion_targets("mana"), vec![Attribute::Mana]);
        assert_eq!(
            potion_targets("Health/Mana"),
            vec![Attribute::Health, Attribute::Mana]
        );
        assert_eq!(potion_targets("Strength"), vec![Attribute::Strength]);
        assert_eq!(potion_targets("All"), Attribute::ALL.to_vec());
        assert!(potion_targets("Defense").is_empty());
        assert!(potion_targets("").is_empty());
    }

    #[test]
    fn test_required_exp() {
        assert_eq!(required_exp(1), 10);
        assert_eq!(required_exp(7), 70);
    }
}
