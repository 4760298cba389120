//! Heroes: the player-controlled side of a battle.

use crate::entity::{Entity, Pool};
use crate::formulas::{self, round_half_up, LEVEL_UP_POOL_GROWTH, REGEN_RATE};
use crate::inventory::{Equipment, Inventory};
use crate::items::{Armor, Attribute, Weapon};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Multiplier for a class's favored stats on level-up.
pub const FAVORED_GROWTH: f64 = 1.10;

/// Multiplier for the remaining stats on level-up.
pub const NORMAL_GROWTH: f64 = 1.05;

/// HP granted per hero level at creation.
pub const HP_PER_LEVEL: i32 = 100;

/// Hero classes. The class only decides which stats grow faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroClass {
    Paladin,
    Sorcerer,
    Warrior,
}

/// Per-stat level-up multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatGrowth {
    pub strength: f64,
    pub dexterity: f64,
    pub agility: f64,
}

impl HeroClass {
    pub fn name(&self) -> &'static str {
        match self {
            HeroClass::Paladin => "Paladin",
            HeroClass::Sorcerer => "Sorcerer",
            HeroClass::Warrior => "Warrior",
        }
    }

    pub fn all() -> [HeroClass; 3] {
        [HeroClass::Paladin, HeroClass::Sorcerer, HeroClass::Warrior]
    }

    /// Level-up growth table.
    ///
    /// Paladins favor strength and dexterity, sorcerers dexterity and
    /// agility, warriors strength and agility.
    pub fn growth(&self) -> StatGrowth {
        match self {
            HeroClass::Paladin => StatGrowth {
                strength: FAVORED_GROWTH,
                dexterity: FAVORED_GROWTH,
                agility: NORMAL_GROWTH,
            },
            HeroClass::Sorcerer => StatGrowth {
                strength: NORMAL_GROWTH,
                dexterity: FAVORED_GROWTH,
                agility: FAVORED_GROWTH,
            },
            HeroClass::Warrior => StatGrowth {
                strength: FAVORED_GROWTH,
                dexterity: NORMAL_GROWTH,
                agility: FAVORED_GROWTH,
            },
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything needed to create a hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSpec {
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    /// Defaults to `HP_PER_LEVEL * level`.
    pub base_hp: Option<i32>,
    pub mana: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub gold: i32,
    pub exp: i32,
}

impl HeroSpec {
    /// A level 1 hero with zeroed stats.
    pub fn new(name: impl Into<String>, class: HeroClass) -> Self {
        Self {
            name: name.into(),
            class,
            level: 1,
            base_hp: None,
            mana: 0,
            strength: 0,
            dexterity: 0,
            agility: 0,
            gold: 0,
            exp: 0,
        }
    }
}

/// A player-controlled combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    entity: Entity,
    class: HeroClass,
    hp: Pool,
    mp: Pool,
    strength: i32,
    dexterity: i32,
    agility: i32,
    gold: i32,
    exp: i32,
    equipment: Equipment,
    inventory: Inventory,
}

impl Hero {
    pub fn new(spec: HeroSpec) -> Self {
        let entity = Entity::new(spec.name, spec.level);
        let base_hp = spec
            .base_hp
            .unwrap_or(HP_PER_LEVEL.saturating_mul(entity.level() as i32));
        Self {
            entity,
            class: spec.class,
            hp: Pool::new(base_hp),
            mp: Pool::new(spec.mana),
            strength: spec.strength,
            dexterity: spec.dexterity,
            agility: spec.agility,
            gold: spec.gold.max(0),
            exp: spec.exp.max(0),
            equipment: Equipment::new(),
            inventory: Inventory::new(),
        }
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

    pub fn class(&self) -> HeroClass {
        self.class
    }

    pub fn hp(&self) -> i32 {
        self.hp.current()
    }

    pub fn base_hp(&self) -> i32 {
        self.hp.base()
    }

    pub fn mp(&self) -> i32 {
        self.mp.current()
    }

    pub fn base_mp(&self) -> i32 {
        self.mp.base()
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn dexterity(&self) -> i32 {
        self.dexterity
    }

    pub fn agility(&self) -> i32 {
        self.agility
    }

    pub fn gold(&self) -> i32 {
        self.gold
    }

    pub fn exp(&self) -> i32 {
        self.exp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp.is_empty()
    }

    // ------------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------------

    /// No-op for non-positive damage or a fainted hero.
    pub fn take_damage(&mut self, amount: i32) {
        if self.is_fainted() {
            return;
        }
        self.hp.drain(amount);
    }

    /// End-of-round regeneration: +10% HP and MP, never above base.
    pub fn regen_after_round(&mut self) {
        if self.is_fainted() {
            return;
        }
        self.hp.regenerate(REGEN_RATE);
        self.mp.regenerate(REGEN_RATE);
    }

    /// Bring a fainted hero back with half HP and MP. Returns true if revived.
    pub fn revive_after_battle(&mut self) -> bool {
        if !self.is_fainted() {
            return false;
        }
        self.hp.refill_half();
        self.mp.refill_half();
        true
    }

    pub fn spend_mp(&mut self, amount: i32) -> bool {
        self.mp.try_spend(amount)
    }

    // ------------------------------------------------------------------------
    // Potions
    // ------------------------------------------------------------------------

    pub fn add_hp(&mut self, amount: i32) {
        self.hp.add(amount);
    }

    pub fn add_mp(&mut self, amount: i32) {
        self.mp.add(amount);
    }

    pub fn add_strength(&mut self, amount: i32) {
        self.strength = self.strength.saturating_add(amount);
    }

    pub fn add_dexterity(&mut self, amount: i32) {
        self.dexterity = self.dexterity.saturating_add(amount);
    }

    pub fn add_agility(&mut self, amount: i32) {
        self.agility = self.agility.saturating_add(amount);
    }

    /// Raise one attribute and return its new value.
    pub fn raise(&mut self, attribute: Attribute, amount: i32) -> i32 {
        match attribute {
            Attribute::Health => {
                self.add_hp(amount);
                self.hp()
            }
            Attribute::Mana => {
                self.add_mp(amount);
                self.mp()
            }
            Attribute::Strength => {
                self.add_strength(amount);
                self.strength
            }
            Attribute::Dexterity => {
                self.add_dexterity(amount);
                self.dexterity
            }
            Attribute::Agility => {
                self.add_agility(amount);
                self.agility
            }
        }
    }

    // ------------------------------------------------------------------------
    // Economy and progression
    // ------------------------------------------------------------------------

    pub fn add_gold(&mut self, amount: i32) {
        self.gold = self.gold.saturating_add(amount).max(0);
    }

    /// Pay `amount` gold. Returns false without mutation if the hero can't afford it.
    pub fn spend_gold(&mut self, amount: i32) -> bool {
        let amount = amount.max(0);
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Experience needed to reach the next level.
    pub fn required_exp(&self) -> i32 {
        formulas::required_exp(self.level())
    }

    /// Add experience and level up as many times as it pays for.
    ///
    /// Each level-up subtracts that level's threshold, so `exp` always ends
    /// below the next threshold and never goes negative. Returns the number
    /// of levels gained.
    pub fn gain_experience(&mut self, amount: i32) -> u32 {
        if amount <= 0 {
            return 0;
        }
        self.exp = self.exp.saturating_add(amount);

        let mut gained = 0;
        while self.exp >= self.required_exp() {
            self.exp -= self.required_exp();
            self.level_up();
            gained += 1;
        }
        gained
    }

    /// Advance one level: +10% base HP/MP, full refill, class stat growth.
    pub fn level_up(&mut self) {
        let level = self.entity.advance_level();
        self.hp.grow_base(LEVEL_UP_POOL_GROWTH);
        self.mp.grow_base(LEVEL_UP_POOL_GROWTH);

        let growth = self.class.growth();
        self.strength = round_half_up(f64::from(self.strength) * growth.strength);
        self.dexterity = round_half_up(f64::from(self.dexterity) * growth.dexterity);
        self.agility = round_half_up(f64::from(self.agility) * growth.agility);

        info!(hero = %self.name(), level, "hero leveled up");
    }

    // ------------------------------------------------------------------------
    // Equipment and inventory
    // ------------------------------------------------------------------------

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.equipment
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// See [`Equipment::equip_weapon`] for the hand-slot rules.
    pub fn equip_weapon(&mut self, weapon: Option<Weapon>) -> bool {
        self.equipment.equip_weapon(weapon)
    }

    pub fn set_armor(&mut self, armor: Option<Armor>) {
        self.equipment.set_armor(armor);
    }

    pub fn equipped_weapon_damage(&self) -> i32 {
        self.equipment.weapon_damage()
    }

    pub fn armor_reduction(&self) -> i32 {
        self.equipment.armor_reduction()
    }
}

impl fmt::Display for Hero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} the {} (Lv {}, HP {}/{}, MP {}/{}, str {}, dex {}, agi {}, gold {}, exp {})",
            self.name(),
            self.class,
            self.level(),
            self.hp(),
            self.base_hp(),
            self.mp(),
            self.base_mp(),
            self.strength,
            self.dexterity,
            self.agility,
            self.gold,
            self.exp
        )
    }
}
