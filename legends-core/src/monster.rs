//! Monsters and their battle-local debuffs.

use crate::entity::{Entity, Pool};
use crate::formulas::debuffed;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HP granted per monster level.
pub const HP_PER_LEVEL: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Dragon,
    Exoskeleton,
    Spirit,
}

impl MonsterKind {
    pub fn name(&self) -> &'static str {
        match self {
            MonsterKind::Dragon => "Dragon",
            MonsterKind::Exoskeleton => "Exoskeleton",
            MonsterKind::Spirit => "Spirit",
        }
    }

    pub fn all() -> [MonsterKind; 3] {
        [MonsterKind::Dragon, MonsterKind::Exoskeleton, MonsterKind::Spirit]
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The three stats a spell can weaken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebuffTarget {
    Defense,
    Damage,
    Dodge,
}

impl DebuffTarget {
    pub fn name(&self) -> &'static str {
        match self {
            DebuffTarget::Defense => "defense",
            DebuffTarget::Damage => "damage",
            DebuffTarget::Dodge => "dodge",
        }
    }
}

impl fmt::Display for DebuffTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A monster's offensive and defensive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: i32,
    pub defense: i32,
    /// Percent, nominally 0 to 100.
    pub dodge: i32,
}

impl CombatStats {
    pub fn new(damage: i32, defense: i32, dodge: i32) -> Self {
        Self {
            damage: damage.max(0),
            defense: defense.max(0),
            dodge: dodge.max(0),
        }
    }
}

/// A computer-controlled combatant.
///
/// `base` holds the values the monster was built with; `live` is what combat
/// reads and debuffs touch. [`Monster::reset_for_battle`] copies one onto the
/// other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    entity: Entity,
    kind: MonsterKind,
    hp: Pool,
    base: CombatStats,
    live: CombatStats,
}

impl Monster {
    pub fn new(kind: MonsterKind, name: impl Into<String>, level: u32, stats: CombatStats) -> Self {
        let entity = Entity::new(name, level);
        let hp = Pool::new(HP_PER_LEVEL.saturating_mul(entity.level() as i32));
        Self {
            entity,
            kind,
            hp,
            base: stats,
            live: stats,
        }
    }

    /// Override the level-derived HP.
    pub fn with_base_hp(mut self, base_hp: i32) -> Self {
        self.hp = Pool::new(base_hp);
        self
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn level(&self) -> u32 {
        self.entity.level()
    }

    pub fn kind(&self) -> MonsterKind {
        self.kind
    }

    pub fn hp(&self) -> i32 {
        self.hp.current()
    }

    pub fn base_hp(&self) -> i32 {
        self.hp.base()
    }

    pub fn damage(&self) -> i32 {
        self.live.damage
    }

    pub fn defense(&self) -> i32 {
        self.live.defense
    }

    pub fn dodge(&self) -> i32 {
        self.live.dodge
    }

    pub fn base_stats(&self) -> CombatStats {
        self.base
    }

    pub fn live_stats(&self) -> CombatStats {
        self.live
    }

    pub fn is_dead(&self) -> bool {
        self.hp.is_empty()
    }

    /// No-op for non-positive damage or a dead monster.
    pub fn take_damage(&mut self, amount: i32) {
        if self.is_dead() {
            return;
        }
        self.hp.drain(amount);
    }

    /// Full HP and undo every debuff.
    pub fn reset_for_battle(&mut self) {
        self.hp.refill();
        self.live = self.base;
    }

    pub fn reduce_defense_percent(&mut self, percent: f64) {
        self.live.defense = debuffed(self.live.defense, percent);
    }

    pub fn reduce_damage_percent(&mut self, percent: f64) {
        self.live.damage = debuffed(self.live.damage, percent);
    }

    pub fn reduce_dodge_percent(&mut self, percent: f64) {
        self.live.dodge = debuffed(self.live.dodge, percent);
    }

    /// Apply a debuff and return the stat's new value.
    pub fn apply_debuff(&mut self, target: DebuffTarget, percent: f64) -> i32 {
        match target {
            DebuffTarget::Defense => {
                self.reduce_defense_percent(percent);
                self.live.defense
            }
            DebuffTarget::Damage => {
                self.reduce_damage_percent(percent);
                self.live.damage
            }
            DebuffTarget::Dodge => {
                self.reduce_dodge_percent(percent);
                self.live.dodge
            }
        }
    }

    /// A fresh copy of this template, ready to fight.
    pub fn spawn(&self) -> Monster {
        let mut monster = self.clone();
        monster.reset_for_battle();
        monster
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} the {} (Lv {}, HP {}/{}, dmg {}, def {}, dodge {})",
            self.name(),
            self.kind,
            self.level(),
            self.hp(),
            self.base_hp(),
            self.live.damage,
            self.live.defense,
            self.live.dodge
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::SPELL_DEBUFF;

    fn dragon() -> Monster {
        Monster::new(MonsterKind::Dragon, "Desghidorrah", 3, CombatStats::new(300, 400, 35))
    }

    #[test]
    fn test_hp_from_level() {
        let m = dragon();
        assert_eq!(m.base_hp(), 300);
        assert_eq!(m.hp(), 300);
        assert_eq!(m.with_base_hp(50).hp(), 50);
    }

    #[test]
    fn test_take_damage_and_death() {
        let mut m = dragon();
        m.take_damage(-10);
        assert_eq!(m.hp(), 300);
        m.take_damage(299);
        assert!(!m.is_dead());
        m.take_damage(5000);
        assert_eq!(m.hp(), 0);
        assert!(m.is_dead());
    }

    #[test]
    fn test_debuffs_and_reset() {
        let mut m = dragon();
        m.reduce_defense_percent(SPELL_DEBUFF);
        m.reduce_damage_percent(SPELL_DEBUFF);
        m.reduce_dodge_percent(SPELL_DEBUFF);
        assert_eq!(m.defense(), 320);
        assert_eq!(m.damage(), 240);
        assert_eq!(m.dodge(), 28);
        assert_eq!(m.base_stats(), CombatStats::new(300, 400, 35));

        m.take_damage(100);
        m.reset_for_battle();
        assert_eq!(m.live_stats(), m.base_stats());
        assert_eq!(m.hp(), 300);
    }

    #[test]
    fn test_non_positive_debuff_is_noop() {
        let mut m = dragon();
        assert_eq!(m.apply_debuff(DebuffTarget::Defense, 0.0), 400);
        assert_eq!(m.apply_debuff(DebuffTarget::Dodge, -1.0), 35);
    }

    #[test]
    fn test_spawn_leaves_template_untouched() {
        let template = dragon();
        let mut a = template.spawn();
        a.take_damage(100);
        a.apply_debuff(DebuffTarget::Damage, SPELL_DEBUFF);
        let b = template.spawn();
        assert_eq!(b.hp(), 300);
        assert_eq!(b.damage(), 300);
        assert_eq!(template.hp(), 300);
    }
}
