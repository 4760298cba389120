//! The battle state machine.
//!
//! A [`Battle`] borrows the party, owns its monsters and its RNG, and runs
//! rounds until one side is out of fighters:
//!
//! ```text
//! Init -> { HeroPhase -> MonsterPhase -> RegenPhase }* -> Resolved
//! ```
//!
//! Termination is checked after every phase, so a battle that starts with an
//! empty side resolves before the first round. Everything that changes is
//! reported to the [`BattleController`] as a [`BattleEvent`].

use crate::action::{ActionError, ActionReport, EquipmentChoice, HeroAction, MenuChoice};
use crate::controller::{BattleController, ChoiceKind, ChoiceOption, ChoiceRequest, TurnContext};
use crate::events::{BattleEvent, BattlePhase, BattleStatus, HeroSummary, MonsterSummary, StatChange};
use crate::formulas::{self, GOLD_PER_MONSTER_LEVEL, SPELL_DEBUFF};
use crate::hero::Hero;
use crate::items::{Item, ItemId, ItemKind};
use crate::monster::Monster;
use crate::party::Party;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What each surviving hero earns from a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub gold: i32,
    pub exp: i32,
}

impl Rewards {
    /// Gold scales with the strongest monster, experience with all of them.
    pub fn for_monsters(monsters: &[Monster]) -> Self {
        let max_level = monsters.iter().map(Monster::level).max().unwrap_or(0);
        let total_levels: u32 = monsters.iter().map(Monster::level).sum();
        Self {
            gold: GOLD_PER_MONSTER_LEVEL.saturating_mul(max_level as i32),
            exp: total_levels as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory { rewards: Rewards, rounds: u32 },
    Defeat { rounds: u32 },
}

impl BattleOutcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, BattleOutcome::Victory { .. })
    }

    pub fn rounds(&self) -> u32 {
        match self {
            BattleOutcome::Victory { rounds, .. } | BattleOutcome::Defeat { rounds } => *rounds,
        }
    }
}

/// One fight between the party and a group of monsters.
pub struct Battle<'p, R: Rng> {
    party: &'p mut Party,
    monsters: Vec<Monster>,
    rng: R,
    round: u32,
    phase: BattlePhase,
}

impl<'p, R: Rng> Battle<'p, R> {
    /// Set up a battle. Every monster starts at full HP with no debuffs.
    pub fn new(party: &'p mut Party, mut monsters: Vec<Monster>, rng: R) -> Self {
        for monster in &mut monsters {
            monster.reset_for_battle();
        }
        Self {
            party,
            monsters,
            rng,
            round: 0,
            phase: BattlePhase::Init,
        }
    }

    pub fn party(&self) -> &Party {
        self.party
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn living_monster_indices(&self) -> Vec<usize> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_dead())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_living_monsters(&self) -> bool {
        self.monsters.iter().any(|m| !m.is_dead())
    }

    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            round: self.round,
            heroes: self.party.iter().map(HeroSummary::from).collect(),
            monsters: self.monsters.iter().map(MonsterSummary::from).collect(),
        }
    }

    /// Fight to the end.
    pub fn run<C: BattleController + ?Sized>(mut self, controller: &mut C) -> BattleOutcome {
        info!(
            heroes = self.party.len(),
            monsters = self.monsters.len(),
            "battle started"
        );
        controller.notify(&BattleEvent::BattleStarted {
            heroes: self.party.iter().map(|h| h.name().to_string()).collect(),
            monsters: self.monsters.iter().map(|m| m.name().to_string()).collect(),
        });
        controller.notify(&BattleEvent::Status(self.status()));

        loop {
            if !self.party.has_living() {
                return self.finish_defeat(controller);
            }
            if !self.has_living_monsters() {
                return self.finish_victory(controller);
            }

            self.round += 1;
            controller.notify(&BattleEvent::RoundStarted { round: self.round });

            self.hero_phase(controller);
            if !self.has_living_monsters() {
                continue;
            }

            self.monster_phase(controller);
            if !self.party.has_living() {
                continue;
            }

            self.regen_phase(controller);
        }
    }

    // ------------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------------

    fn enter_phase<C: BattleController + ?Sized>(&mut self, phase: BattlePhase, controller: &mut C) {
        self.phase = phase;
        controller.notify(&BattleEvent::PhaseStarted { phase });
    }

    fn hero_phase<C: BattleController + ?Sized>(&mut self, controller: &mut C) {
        self.enter_phase(BattlePhase::HeroPhase, controller);

        // Heroes cannot faint during their own phase, so the list stays valid.
        for hero_index in self.party.living_indices() {
            if !self.has_living_monsters() {
                break;
            }
            self.hero_turn(hero_index, controller);
        }
    }

    fn hero_turn<C: BattleController + ?Sized>(&mut self, hero_index: usize, controller: &mut C) {
        let Some(hero_name) = self.party.get(hero_index).map(|h| h.name().to_string()) else {
            return;
        };
        controller.notify(&BattleEvent::TurnStarted {
            hero: hero_name.clone(),
            round: self.round,
        });

        loop {
            let action = match self.next_action(hero_index, &hero_name, controller) {
                TurnStep::Act(action) => action,
                TurnStep::Retry => continue,
                TurnStep::Forfeit => return,
            };

            match self.perform(hero_index, action) {
                Ok(report) => {
                    for event in &report.events {
                        controller.notify(event);
                    }
                    if report.turn_consumed {
                        return;
                    }
                }
                Err(err) => {
                    debug!(hero = %hero_name, error = %err, "action rejected");
                    controller.notify(&BattleEvent::ActionRejected {
                        hero: hero_name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    /// Walk the menus until the controller settles on a concrete action.
    fn next_action<C: BattleController + ?Sized>(
        &self,
        hero_index: usize,
        hero_name: &str,
        controller: &mut C,
    ) -> TurnStep {
        let Some(hero) = self.party.get(hero_index) else {
            return TurnStep::Forfeit;
        };
        let ctx = TurnContext {
            hero_index,
            hero,
            party: self.party,
            monsters: &self.monsters,
            round: self.round,
        };

        let selection = match controller.choose_action(&ctx) {
            // Backing out of the target list still spends the attack.
            MenuChoice::Attack => match self.pick_target(hero_name, controller) {
                Ok(Some(target)) => return TurnStep::Act(HeroAction::Attack { target }),
                Ok(None) => {
                    controller.notify(&BattleEvent::ActionCancelled {
                        hero: hero_name.to_string(),
                    });
                    return TurnStep::Forfeit;
                }
                Err(err) => Err(err),
            },
            MenuChoice::CastSpell => match self.pick_item(hero, ItemKind::Spell, controller) {
                Ok(Some(spell)) => self
                    .pick_target(hero_name, controller)
                    .map(|target| target.map(|target| HeroAction::CastSpell { spell, target })),
                other => other.map(|_| None),
            },
            MenuChoice::UsePotion => self
                .pick_item(hero, ItemKind::Potion, controller)
                .map(|potion| potion.map(|potion| HeroAction::UsePotion { potion })),
            MenuChoice::ChangeEquipment => match controller.choose_equipment(&ctx) {
                EquipmentChoice::Weapon => self
                    .pick_item(hero, ItemKind::Weapon, controller)
                    .map(|weapon| weapon.map(|weapon| HeroAction::EquipWeapon { weapon })),
                EquipmentChoice::Armor => self
                    .pick_item(hero, ItemKind::Armor, controller)
                    .map(|armor| armor.map(|armor| HeroAction::EquipArmor { armor })),
                EquipmentChoice::Back => return TurnStep::Retry,
            },
            MenuChoice::ShowHeroStats => {
                controller.notify(&BattleEvent::HeroStats {
                    heroes: self.party.iter().map(HeroSummary::from).collect(),
                });
                return TurnStep::Retry;
            }
            MenuChoice::ShowMonsterStats => {
                controller.notify(&BattleEvent::MonsterStats {
                    monsters: self.monsters.iter().map(MonsterSummary::from).collect(),
                });
                return TurnStep::Retry;
            }
            MenuChoice::Skip => return TurnStep::Act(HeroAction::Skip),
        };

        match selection {
            Ok(Some(action)) => TurnStep::Act(action),
            Ok(None) => {
                controller.notify(&BattleEvent::ActionCancelled {
                    hero: hero_name.to_string(),
                });
                TurnStep::Retry
            }
            Err(err) => {
                controller.notify(&BattleEvent::ActionRejected {
                    hero: hero_name.to_string(),
                    reason: err.to_string(),
                });
                TurnStep::Retry
            }
        }
    }

    /// Ask for a living monster. `Ok(None)` on cancel.
    fn pick_target<C: BattleController + ?Sized>(
        &self,
        hero_name: &str,
        controller: &mut C,
    ) -> Result<Option<usize>, ActionError> {
        let living = self.living_monster_indices();
        if living.is_empty() {
            return Err(ActionError::NoTargets);
        }

        let request = ChoiceRequest {
            kind: ChoiceKind::Target,
            hero: hero_name.to_string(),
            options: living
                .iter()
                .map(|&i| {
                    let m = &self.monsters[i];
                    ChoiceOption::new(
                        m.name(),
                        format!(
                            "Lv {} HP {} dmg {} def {} dodge {}",
                            m.level(),
                            m.hp(),
                            m.damage(),
                            m.defense(),
                            m.dodge()
                        ),
                    )
                })
                .collect(),
        };

        Ok(select(&request, controller).map(|pick| living[pick]))
    }

    /// Ask for an inventory item of one kind. `Ok(None)` on cancel.
    fn pick_item<C: BattleController + ?Sized>(
        &self,
        hero: &Hero,
        kind: ItemKind,
        controller: &mut C,
    ) -> Result<Option<ItemId>, ActionError> {
        let equipment = hero.equipment();
        let options: Vec<ChoiceOption> = hero
            .inventory()
            .iter()
            .filter(|item| item.kind() == kind)
            .map(|item| {
                let mut detail = format!("{} (level {})", item.summary(), item.level());
                if equipment.is_equipped(item.id()) {
                    detail.push_str(" [equipped]");
                }
                ChoiceOption::new(item.name(), detail).with_item(item.id())
            })
            .collect();
        if options.is_empty() {
            return Err(ActionError::NothingToChoose(kind));
        }

        let choice_kind = match kind {
            ItemKind::Weapon => ChoiceKind::Weapon,
            ItemKind::Armor => ChoiceKind::Armor,
            ItemKind::Potion => ChoiceKind::Potion,
            ItemKind::Spell => ChoiceKind::Spell,
        };
        let request = ChoiceRequest {
            kind: choice_kind,
            hero: hero.name().to_string(),
            options,
        };

        Ok(select(&request, controller).and_then(|pick| request.options[pick].item))
    }

    fn monster_phase<C: BattleController + ?Sized>(&mut self, controller: &mut C) {
        self.enter_phase(BattlePhase::MonsterPhase, controller);

        for monster_index in 0..self.monsters.len() {
            if self.monsters[monster_index].is_dead() {
                continue;
            }
            let living = self.party.living_indices();
            if living.is_empty() {
                break;
            }
            let hero_index = living[self.rng.gen_range(0..living.len())];
            for event in self.monster_attack(monster_index, hero_index) {
                controller.notify(&event);
            }
        }
    }

    fn monster_attack(&mut self, monster_index: usize, hero_index: usize) -> Vec<BattleEvent> {
        let monster = &self.monsters[monster_index];
        let Some(hero) = self.party.get_mut(hero_index) else {
            return Vec::new();
        };
        let monster_name = monster.name().to_string();
        let hero_name = hero.name().to_string();

        let chance = formulas::hero_dodge_chance(hero.agility());
        if formulas::roll_dodge(&mut self.rng, chance) {
            debug!(monster = %monster_name, hero = %hero_name, chance, "hero dodged");
            return vec![BattleEvent::HeroDodged {
                monster: monster_name,
                hero: hero_name,
            }];
        }

        let damage = formulas::monster_attack_damage(monster.damage(), hero.armor_reduction());
        hero.take_damage(damage);
        debug!(monster = %monster_name, hero = %hero_name, damage, hp = hero.hp(), "monster attack");

        let mut events = vec![BattleEvent::MonsterAttacked {
            monster: monster_name.clone(),
            hero: hero_name.clone(),
            damage,
            hero_hp: hero.hp(),
        }];
        if hero.is_fainted() {
            events.push(BattleEvent::HeroFainted {
                hero: hero_name,
                by: monster_name,
            });
        }
        events
    }

    fn regen_phase<C: BattleController + ?Sized>(&mut self, controller: &mut C) {
        self.enter_phase(BattlePhase::RegenPhase, controller);

        for hero in self.party.iter_mut().filter(|h| !h.is_fainted()) {
            hero.regen_after_round();
            controller.notify(&BattleEvent::Regenerated {
                hero: hero.name().to_string(),
                hp: hero.hp(),
                mp: hero.mp(),
            });
        }
        controller.notify(&BattleEvent::Status(self.status()));
    }

    fn finish_victory<C: BattleController + ?Sized>(mut self, controller: &mut C) -> BattleOutcome {
        self.phase = BattlePhase::Resolved;
        let rewards = Rewards::for_monsters(&self.monsters);
        info!(rounds = self.round, gold = rewards.gold, exp = rewards.exp, "battle won");
        controller.notify(&BattleEvent::Victory {
            rewards,
            rounds: self.round,
        });

        for hero in self.party.iter_mut() {
            let name = hero.name().to_string();
            if hero.revive_after_battle() {
                controller.notify(&BattleEvent::Revived {
                    hero: name,
                    hp: hero.hp(),
                    mp: hero.mp(),
                });
                continue;
            }

            hero.add_gold(rewards.gold);
            let gained = hero.gain_experience(rewards.exp);
            controller.notify(&BattleEvent::RewardGranted {
                hero: name.clone(),
                gold: rewards.gold,
                exp: rewards.exp,
            });
            let level = hero.level();
            for reached in (level - gained + 1)..=level {
                controller.notify(&BattleEvent::LeveledUp {
                    hero: name.clone(),
                    level: reached,
                });
            }
        }

        BattleOutcome::Victory {
            rewards,
            rounds: self.round,
        }
    }

    fn finish_defeat<C: BattleController + ?Sized>(mut self, controller: &mut C) -> BattleOutcome {
        self.phase = BattlePhase::Resolved;
        info!(rounds = self.round, "battle lost");
        controller.notify(&BattleEvent::Defeat { rounds: self.round });
        BattleOutcome::Defeat { rounds: self.round }
    }

    // ------------------------------------------------------------------------
    // Action resolution
    // ------------------------------------------------------------------------

    /// Resolve one concrete action for a hero.
    ///
    /// On `Err` nothing has changed and the hero may act again.
    pub fn perform(&mut self, hero_index: usize, action: HeroAction) -> Result<ActionReport, ActionError> {
        let hero = self
            .party
            .get(hero_index)
            .ok_or(ActionError::NoSuchHero(hero_index))?;
        if hero.is_fainted() {
            return Err(ActionError::HeroFainted(hero.name().to_string()));
        }

        let turn_consumed = action.consumes_turn();
        let events = match action {
            HeroAction::Attack { target } => self.resolve_attack(hero_index, target)?,
            HeroAction::CastSpell { spell, target } => self.resolve_spell(hero_index, spell, target)?,
            HeroAction::UsePotion { potion } => self.resolve_potion(hero_index, potion)?,
            HeroAction::EquipWeapon { weapon } => self.resolve_equip_weapon(hero_index, weapon)?,
            HeroAction::EquipArmor { armor } => self.resolve_equip_armor(hero_index, armor)?,
            HeroAction::Skip => vec![BattleEvent::TurnSkipped {
                hero: hero.name().to_string(),
            }],
        };
        Ok(ActionReport {
            turn_consumed,
            events,
        })
    }

    fn hero_mut(&mut self, hero_index: usize) -> Result<&mut Hero, ActionError> {
        self.party
            .get_mut(hero_index)
            .ok_or(ActionError::NoSuchHero(hero_index))
    }

    fn check_target(&self, target: usize) -> Result<(), ActionError> {
        if !self.has_living_monsters() {
            return Err(ActionError::NoTargets);
        }
        let monster = self
            .monsters
            .get(target)
            .ok_or(ActionError::NoSuchMonster(target))?;
        if monster.is_dead() {
            return Err(ActionError::TargetDefeated(monster.name().to_string()));
        }
        Ok(())
    }

    fn resolve_attack(&mut self, hero_index: usize, target: usize) -> Result<Vec<BattleEvent>, ActionError> {
        self.check_target(target)?;
        let hero = self
            .party
            .get(hero_index)
            .ok_or(ActionError::NoSuchHero(hero_index))?;
        let hero_name = hero.name().to_string();
        let (strength, weapon_damage) = (hero.strength(), hero.equipped_weapon_damage());

        let monster = &mut self.monsters[target];
        let monster_name = monster.name().to_string();
        let mut events = Vec::new();

        let chance = formulas::monster_dodge_chance(monster.dodge());
        if formulas::roll_dodge(&mut self.rng, chance) {
            debug!(hero = %hero_name, monster = %monster_name, chance, "monster dodged");
            events.push(BattleEvent::MonsterDodged {
                hero: hero_name,
                monster: monster_name,
            });
            return Ok(events);
        }

        let damage = formulas::hero_attack_damage(strength, weapon_damage, monster.defense());
        monster.take_damage(damage);
        debug!(hero = %hero_name, monster = %monster_name, damage, hp = monster.hp(), "hero attack");

        events.push(BattleEvent::HeroAttacked {
            hero: hero_name.clone(),
            monster: monster_name.clone(),
            damage,
            monster_hp: monster.hp(),
        });
        if monster.is_dead() {
            events.push(BattleEvent::MonsterDefeated {
                monster: monster_name,
                by: hero_name,
            });
        }
        Ok(events)
    }

    fn resolve_spell(
        &mut self,
        hero_index: usize,
        spell_id: ItemId,
        target: usize,
    ) -> Result<Vec<BattleEvent>, ActionError> {
        let hero = self
            .party
            .get(hero_index)
            .ok_or(ActionError::NoSuchHero(hero_index))?;
        let spell = match hero.inventory().get(spell_id) {
            Some(Item::Spell(spell)) => spell.clone(),
            Some(other) => {
                return Err(ActionError::WrongItemKind {
                    name: other.name().to_string(),
                    expected: ItemKind::Spell,
                })
            }
            None => return Err(ActionError::ItemNotFound),
        };
        self.check_target(target)?;

        let hero = self.hero_mut(hero_index)?;
        if !hero.spend_mp(spell.mana_cost) {
            return Err(ActionError::InsufficientMana {
                spell: spell.name,
                needed: spell.mana_cost,
                available: hero.mp(),
            });
        }
        hero.inventory_mut().remove(spell.id);
        let hero_name = hero.name().to_string();
        let dexterity = hero.dexterity();

        let monster = &mut self.monsters[target];
        let monster_name = monster.name().to_string();
        let mut events = Vec::new();

        let chance = formulas::spell_dodge_chance(monster.dodge());
        if formulas::roll_dodge(&mut self.rng, chance) {
            debug!(hero = %hero_name, spell = %spell.name, chance, "spell dodged");
            events.push(BattleEvent::SpellDodged {
                hero: hero_name,
                spell: spell.name,
                monster: monster_name,
            });
            return Ok(events);
        }

        let damage = formulas::spell_damage(spell.damage, dexterity);
        monster.take_damage(damage);
        let stat = spell.element.debuff_target();
        let value = monster.apply_debuff(stat, SPELL_DEBUFF);
        debug!(hero = %hero_name, spell = %spell.name, damage, %stat, value, "spell hit");

        events.push(BattleEvent::SpellCast {
            hero: hero_name.clone(),
            spell: spell.name,
            monster: monster_name.clone(),
            damage,
            monster_hp: monster.hp(),
            mana_spent: spell.mana_cost,
        });
        events.push(BattleEvent::Debuffed {
            monster: monster_name.clone(),
            stat,
            value,
        });
        if monster.is_dead() {
            events.push(BattleEvent::MonsterDefeated {
                monster: monster_name,
                by: hero_name,
            });
        }
        Ok(events)
    }

    fn resolve_potion(&mut self, hero_index: usize, potion_id: ItemId) -> Result<Vec<BattleEvent>, ActionError> {
        let hero = self.hero_mut(hero_index)?;
        let potion = match hero.inventory().get(potion_id) {
            Some(Item::Potion(potion)) => potion.clone(),
            Some(other) => {
                return Err(ActionError::WrongItemKind {
                    name: other.name().to_string(),
                    expected: ItemKind::Potion,
                })
            }
            None => return Err(ActionError::ItemNotFound),
        };

        let targets = formulas::potion_targets(&potion.attribute);
        if targets.is_empty() {
            return Err(ActionError::UnknownPotionEffect {
                potion: potion.name,
                attribute: potion.attribute,
            });
        }

        let changes: Vec<StatChange> = targets
            .into_iter()
            .map(|attribute| StatChange {
                attribute,
                amount: potion.amount,
                new_value: hero.raise(attribute, potion.amount),
            })
            .collect();
        hero.inventory_mut().remove(potion.id);
        debug!(hero = %hero.name(), potion = %potion.name, "potion used");

        Ok(vec![BattleEvent::PotionUsed {
            hero: hero.name().to_string(),
            potion: potion.name,
            changes,
        }])
    }

    fn resolve_equip_weapon(&mut self, hero_index: usize, weapon_id: ItemId) -> Result<Vec<BattleEvent>, ActionError> {
        let hero = self.hero_mut(hero_index)?;
        let weapon = match hero.inventory().get(weapon_id) {
            Some(Item::Weapon(weapon)) => weapon.clone(),
            Some(other) => {
                return Err(ActionError::WrongItemKind {
                    name: other.name().to_string(),
                    expected: ItemKind::Weapon,
                })
            }
            None => return Err(ActionError::ItemNotFound),
        };
        // One item cannot fill both hands.
        if hero.equipment().is_equipped(weapon.id) {
            return Err(ActionError::AlreadyEquipped(weapon.name));
        }

        let name = weapon.name.clone();
        hero.equip_weapon(Some(weapon));
        Ok(vec![BattleEvent::WeaponEquipped {
            hero: hero.name().to_string(),
            weapon: name,
            wielding: hero.equipment().weapons_label(),
        }])
    }

    fn resolve_equip_armor(&mut self, hero_index: usize, armor_id: ItemId) -> Result<Vec<BattleEvent>, ActionError> {
        let hero = self.hero_mut(hero_index)?;
        let armor = match hero.inventory().get(armor_id) {
            Some(Item::Armor(armor)) => armor.clone(),
            Some(other) => {
                return Err(ActionError::WrongItemKind {
                    name: other.name().to_string(),
                    expected: ItemKind::Armor,
                })
            }
            None => return Err(ActionError::ItemNotFound),
        };
        if hero.equipment().is_equipped(armor.id) {
            return Err(ActionError::AlreadyEquipped(armor.name));
        }

        let name = armor.name.clone();
        hero.set_armor(Some(armor));
        Ok(vec![BattleEvent::ArmorEquipped {
            hero: hero.name().to_string(),
            armor: name,
        }])
    }
}

/// What the menu walk settled on for the current hero.
enum TurnStep {
    Act(HeroAction),
    /// Show the action menu again.
    Retry,
    /// The turn ends without an action.
    Forfeit,
}

/// Request a bounded selection until the answer is in range.
///
/// Returns the zero-based option index, or `None` if the controller cancelled.
fn select<C: BattleController + ?Sized>(request: &ChoiceRequest, controller: &mut C) -> Option<usize> {
    loop {
        let answer = controller.choose(request);
        if answer == 0 {
            return None;
        }
        if answer <= request.max() {
            return Some(answer - 1);
        }
        controller.notify(&BattleEvent::InvalidSelection {
            value: answer,
            max: request.max(),
        });
    }
}
