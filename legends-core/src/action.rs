//! Hero actions and the menus that lead to them.
//!
//! A [`MenuChoice`] is what the player picks from the top-level battle menu.
//! Once every sub-selection is made it becomes a concrete [`HeroAction`],
//! which [`crate::battle::Battle::perform`] resolves into events.

use crate::events::BattleEvent;
use crate::items::{ItemId, ItemKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level battle menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuChoice {
    Attack,
    CastSpell,
    UsePotion,
    ChangeEquipment,
    ShowHeroStats,
    ShowMonsterStats,
    Skip,
}

impl MenuChoice {
    /// Menu order as presented to the player. Skip is entry 0.
    pub fn all() -> [MenuChoice; 7] {
        [
            MenuChoice::Attack,
            MenuChoice::CastSpell,
            MenuChoice::UsePotion,
            MenuChoice::ChangeEquipment,
            MenuChoice::ShowHeroStats,
            MenuChoice::ShowMonsterStats,
            MenuChoice::Skip,
        ]
    }

    pub fn number(&self) -> usize {
        match self {
            MenuChoice::Attack => 1,
            MenuChoice::CastSpell => 2,
            MenuChoice::UsePotion => 3,
            MenuChoice::ChangeEquipment => 4,
            MenuChoice::ShowHeroStats => 5,
            MenuChoice::ShowMonsterStats => 6,
            MenuChoice::Skip => 0,
        }
    }

    pub fn from_number(n: usize) -> Option<MenuChoice> {
        Self::all().into_iter().find(|c| c.number() == n)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Attack => "Attack",
            MenuChoice::CastSpell => "Cast spell",
            MenuChoice::UsePotion => "Use potion",
            MenuChoice::ChangeEquipment => "Change equipment",
            MenuChoice::ShowHeroStats => "Show hero stats",
            MenuChoice::ShowMonsterStats => "Show monster stats",
            MenuChoice::Skip => "Skip turn",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Equipment sub-menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentChoice {
    Weapon,
    Armor,
    Back,
}

impl EquipmentChoice {
    pub fn number(&self) -> usize {
        match self {
            EquipmentChoice::Weapon => 1,
            EquipmentChoice::Armor => 2,
            EquipmentChoice::Back => 0,
        }
    }

    pub fn from_number(n: usize) -> Option<EquipmentChoice> {
        match n {
            1 => Some(EquipmentChoice::Weapon),
            2 => Some(EquipmentChoice::Armor),
            0 => Some(EquipmentChoice::Back),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquipmentChoice::Weapon => "Equip weapon",
            EquipmentChoice::Armor => "Equip armor",
            EquipmentChoice::Back => "Back",
        }
    }
}

/// A fully specified action for one hero.
///
/// Monster targets are indices into the battle's monster list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroAction {
    /// Weapon attack on one monster
    Attack { target: usize },

    /// Cast a spell from the inventory at one monster
    CastSpell { spell: ItemId, target: usize },

    /// Drink a potion from the inventory
    UsePotion { potion: ItemId },

    /// Wield a weapon from the inventory
    EquipWeapon { weapon: ItemId },

    /// Wear armor from the inventory
    EquipArmor { armor: ItemId },

    /// Pass the turn
    Skip,
}

impl HeroAction {
    /// Whether a successful resolution ends the hero's turn.
    pub fn consumes_turn(&self) -> bool {
        !matches!(self, HeroAction::EquipWeapon { .. } | HeroAction::EquipArmor { .. })
    }
}

/// Why an action could not be resolved. A rejected action changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{0} has fainted and cannot act")]
    HeroFainted(String),

    #[error("No hero at position {0}")]
    NoSuchHero(usize),

    #[error("No monster at position {0}")]
    NoSuchMonster(usize),

    #[error("{0} is already defeated")]
    TargetDefeated(String),

    #[error("There are no monsters left to target")]
    NoTargets,

    #[error("Item not found in inventory")]
    ItemNotFound,

    #[error("{0} is already equipped")]
    AlreadyEquipped(String),

    #[error("{name} is not a {expected}")]
    WrongItemKind { name: String, expected: ItemKind },

    #[error("Not enough MP to cast {spell}: needs {needed}, has {available}")]
    InsufficientMana {
        spell: String,
        needed: i32,
        available: i32,
    },

    #[error("{potion} has no recognised effect ({attribute})")]
    UnknownPotionEffect { potion: String, attribute: String },

    #[error("No {0} in inventory")]
    NothingToChoose(ItemKind),
}

/// Outcome of one resolved action. `turn_consumed` follows
/// [`HeroAction::consumes_turn`].
#[derive(Debug, Clone, Default)]
pub struct ActionReport {
    pub turn_consumed: bool,
    pub events: Vec<BattleEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_numbers_round_trip() {
        for choice in MenuChoice::all() {
            assert_eq!(MenuChoice::from_number(choice.number()), Some(choice));
        }
        assert_eq!(MenuChoice::from_number(7), None);
        assert_eq!(MenuChoice::from_number(0), Some(MenuChoice::Skip));
    }

    #[test]
    fn test_equipment_changes_are_free() {
        let id = ItemId::new();
        assert!(!HeroAction::EquipWeapon { weapon: id }.consumes_turn());
        assert!(!HeroAction::EquipArmor { armor: id }.consumes_turn());
        assert!(HeroAction::Skip.consumes_turn());
        assert!(HeroAction::Attack { target: 0 }.consumes_turn());
    }

    #[test]
    fn test_error_messages() {
        let err = ActionError::InsufficientMana {
            spell: "Breath_of_Fire".into(),
            needed: 350,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "Not enough MP to cast Breath_of_Fire: needs 350, has 100"
        );
        assert_eq!(ActionError::NothingToChoose(ItemKind::Spell).to_string(), "No spell in inventory");
    }
}
