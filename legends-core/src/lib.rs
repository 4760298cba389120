//! Turn-based combat engine for a party of heroes against monsters.
//!
//! This crate provides:
//! - Heroes and monsters with HP/MP pools, leveling and combat-only debuffs
//! - Items, inventories and hand-slot equipment rules
//! - Pure damage, dodge and potion formulas
//! - A battle state machine driven through the [`BattleController`] trait
//! - Flat-file data loading, encounter generation and a market
//!
//! # Quick Start
//!
//! ```ignore
//! use legends_core::{Battle, GameData, Party};
//! use legends_core::testing::{seeded_rng, ScriptedController};
//!
//! let data = GameData::load_dir("data")?;
//! let mut party = Party::new(data.heroes[..2].to_vec())?;
//! let monsters = legends_core::encounter::generate(&data.monsters, &party, 1, &mut seeded_rng(1));
//!
//! let outcome = Battle::new(&mut party, monsters, seeded_rng(2)).run(&mut ScriptedController::new());
//! println!("victory: {}", outcome.is_victory());
//! ```

pub mod action;
pub mod battle;
pub mod config;
pub mod controller;
pub mod encounter;
pub mod entity;
pub mod events;
pub mod formulas;
pub mod hero;
pub mod inventory;
pub mod items;
pub mod loader;
pub mod market;
pub mod monster;
pub mod party;
pub mod testing;

// Primary public API
pub use action::{ActionError, ActionReport, EquipmentChoice, HeroAction, MenuChoice};
pub use battle::{Battle, BattleOutcome, Rewards};
pub use config::{ConfigError, GameConfig};
pub use controller::{BattleController, ChoiceKind, ChoiceOption, ChoiceRequest, TurnContext};
pub use events::{BattleEvent, BattlePhase};
pub use hero::{Hero, HeroClass, HeroSpec};
pub use items::{Armor, Attribute, Element, Hands, Item, ItemId, ItemKind, Potion, Spell, Weapon};
pub use loader::{GameData, LoadError};
pub use market::{Market, MarketError};
pub use monster::{CombatStats, Monster, MonsterKind};
pub use party::{Party, PartyError};
