//! Testing utilities for the combat engine.
//!
//! This module provides tools for integration testing:
//! - `ScriptedController` for deterministic battles without a console
//! - `BattleHarness` for setting up and running a fight in one call
//! - Fixtures and assertion helpers for verifying battle results

use crate::action::{EquipmentChoice, MenuChoice};
use crate::battle::{Battle, BattleOutcome};
use crate::controller::{BattleController, ChoiceRequest, TurnContext};
use crate::events::BattleEvent;
use crate::hero::{Hero, HeroClass, HeroSpec};
use crate::items::{Armor, Element, Hands, Potion, Spell, Weapon};
use crate::monster::{CombatStats, Monster, MonsterKind};
use crate::party::Party;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// A controller that answers from scripted queues.
///
/// When a queue runs dry it falls back to attacking the first living monster,
/// so a scripted battle always makes progress.
#[derive(Debug, Default)]
pub struct ScriptedController {
    actions: VecDeque<MenuChoice>,
    equipment: VecDeque<EquipmentChoice>,
    picks: VecDeque<usize>,
    events: Vec<BattleEvent>,
    requests: Vec<ChoiceRequest>,
}

impl ScriptedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue top-level menu choices, answered in order.
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = MenuChoice>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Queue equipment sub-menu choices.
    pub fn with_equipment(mut self, choices: impl IntoIterator<Item = EquipmentChoice>) -> Self {
        self.equipment.extend(choices);
        self
    }

    /// Queue raw answers to bounded selections (1-based, 0 cancels).
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn queue_action(&mut self, action: MenuChoice) {
        self.actions.push_back(action);
    }

    /// Every event the battle reported, in order.
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Every selection the battle asked for, in order.
    pub fn requests(&self) -> &[ChoiceRequest] {
        &self.requests
    }

    pub fn count_events(&self, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events.iter().filter(|&e| predicate(e)).count()
    }

    /// True once every scripted answer has been used.
    pub fn is_exhausted(&self) -> bool {
        self.actions.is_empty() && self.equipment.is_empty() && self.picks.is_empty()
    }
}

impl BattleController for ScriptedController {
    fn choose_action(&mut self, _ctx: &TurnContext<'_>) -> MenuChoice {
        self.actions.pop_front().unwrap_or(MenuChoice::Attack)
    }

    fn choose_equipment(&mut self, _ctx: &TurnContext<'_>) -> EquipmentChoice {
        self.equipment.pop_front().unwrap_or(EquipmentChoice::Back)
    }

    fn choose(&mut self, request: &ChoiceRequest) -> usize {
        self.requests.push(request.clone());
        self.picks.pop_front().unwrap_or(1)
    }

    fn notify(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// A deterministic RNG for tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Test harness for running a battle scenario end to end.
pub struct BattleHarness {
    pub party: Party,
    pub monsters: Vec<Monster>,
    pub controller: ScriptedController,
    pub seed: u64,
}

impl BattleHarness {
    pub fn new(party: Party, monsters: Vec<Monster>) -> Self {
        Self {
            party,
            monsters,
            controller: ScriptedController::new(),
            seed: 7,
        }
    }

    pub fn with_controller(mut self, controller: ScriptedController) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the battle to completion.
    pub fn run(&mut self) -> BattleOutcome {
        let battle = Battle::new(&mut self.party, self.monsters.clone(), seeded_rng(self.seed));
        battle.run(&mut self.controller)
    }

    pub fn hero(&self, index: usize) -> &Hero {
        &self.party.members()[index]
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.controller.events()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn sample_paladin(name: &str) -> Hero {
    Hero::new(HeroSpec {
        mana: 300,
        strength: 750,
        agility: 650,
        dexterity: 700,
        gold: 2500,
        exp: 7,
        ..HeroSpec::new(name, HeroClass::Paladin)
    })
}

pub fn sample_sorcerer(name: &str) -> Hero {
    Hero::new(HeroSpec {
        mana: 1300,
        strength: 750,
        agility: 450,
        dexterity: 500,
        gold: 2500,
        exp: 9,
        ..HeroSpec::new(name, HeroClass::Sorcerer)
    })
}

pub fn sample_warrior(name: &str) -> Hero {
    Hero::new(HeroSpec {
        mana: 100,
        strength: 700,
        agility: 500,
        dexterity: 600,
        gold: 1354,
        exp: 7,
        ..HeroSpec::new(name, HeroClass::Warrior)
    })
}

/// A hero that never dodges, for predictable monster damage.
pub fn clumsy_hero(name: &str, strength: i32) -> Hero {
    Hero::new(HeroSpec {
        mana: 500,
        strength,
        ..HeroSpec::new(name, HeroClass::Warrior)
    })
}

pub fn sample_monster(name: &str, level: u32) -> Monster {
    Monster::new(MonsterKind::Dragon, name, level, CombatStats::new(200 * level as i32, 100, 20))
}

/// A monster that never dodges.
pub fn steady_monster(name: &str, level: u32, damage: i32, defense: i32) -> Monster {
    Monster::new(MonsterKind::Exoskeleton, name, level, CombatStats::new(damage, defense, 0))
}

pub fn sample_sword() -> Weapon {
    Weapon::new("Sword", 500, 1, 800, Hands::One)
}

pub fn sample_axe() -> Weapon {
    Weapon::new("Axe", 550, 5, 850, Hands::Two)
}

pub fn sample_armor() -> Armor {
    Armor::new("Platinum_Shield", 150, 1, 200)
}

pub fn sample_potion() -> Potion {
    Potion::new("Healing_Potion", 250, 1, 100, "Health")
}

pub fn sample_spell(element: Element) -> Spell {
    let name = match element {
        Element::Fire => "Flame_Tornado",
        Element::Ice => "Frost_Blizzard",
        Element::Lightning => "Thunder_Blast",
    };
    Spell::new(name, element, 700, 4, 850, 300)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert a hero's HP is at the expected values.
#[track_caller]
pub fn assert_hero_hp(hero: &Hero, current: i32, base: i32) {
    assert_eq!(
        (hero.hp(), hero.base_hp()),
        (current, base),
        "Expected {} HP {current}/{base}, got {}/{}",
        hero.name(),
        hero.hp(),
        hero.base_hp()
    );
}

/// Assert the battle reported at least one event matching `predicate`.
#[track_caller]
pub fn assert_event(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) {
    assert!(
        events.iter().any(predicate),
        "Expected a matching event, got {events:#?}"
    );
}

/// Assert the battle reported no event matching `predicate`.
#[track_caller]
pub fn assert_no_event(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) {
    assert!(
        !events.iter().any(predicate),
        "Expected no matching event, got {events:#?}"
    );
}
