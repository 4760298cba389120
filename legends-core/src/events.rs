//! Battle events.
//!
//! Every state change a battle makes is reported to the controller as a
//! [`BattleEvent`]. Events are plain data: they serialize to JSON for
//! machine consumers and [`BattleEvent::narrate`] renders them as text.

use crate::battle::Rewards;
use crate::hero::{Hero, HeroClass};
use crate::items::Attribute;
use crate::monster::{DebuffTarget, Monster, MonsterKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the battle state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Init,
    HeroPhase,
    MonsterPhase,
    RegenPhase,
    Resolved,
}

impl BattlePhase {
    pub fn name(&self) -> &'static str {
        match self {
            BattlePhase::Init => "init",
            BattlePhase::HeroPhase => "heroes' turn",
            BattlePhase::MonsterPhase => "monsters' turn",
            BattlePhase::RegenPhase => "regeneration",
            BattlePhase::Resolved => "resolved",
        }
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Snapshot of one hero for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSummary {
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    pub hp: i32,
    pub base_hp: i32,
    pub mp: i32,
    pub base_mp: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub gold: i32,
    pub exp: i32,
    pub weapons: String,
    pub armor: String,
}

impl From<&Hero> for HeroSummary {
    fn from(hero: &Hero) -> Self {
        Self {
            name: hero.name().to_string(),
            class: hero.class(),
            level: hero.level(),
            hp: hero.hp(),
            base_hp: hero.base_hp(),
            mp: hero.mp(),
            base_mp: hero.base_mp(),
            strength: hero.strength(),
            dexterity: hero.dexterity(),
            agility: hero.agility(),
            gold: hero.gold(),
            exp: hero.exp(),
            weapons: hero.equipment().weapons_label(),
            armor: hero.equipment().armor_label(),
        }
    }
}

/// Snapshot of one monster for display. Stats are the live (debuffed) values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSummary {
    pub name: String,
    pub kind: MonsterKind,
    pub level: u32,
    pub hp: i32,
    pub base_hp: i32,
    pub damage: i32,
    pub defense: i32,
    pub dodge: i32,
}

impl From<&Monster> for MonsterSummary {
    fn from(monster: &Monster) -> Self {
        Self {
            name: monster.name().to_string(),
            kind: monster.kind(),
            level: monster.level(),
            hp: monster.hp(),
            base_hp: monster.base_hp(),
            damage: monster.damage(),
            defense: monster.defense(),
            dodge: monster.dodge(),
        }
    }
}

/// Both sides at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleStatus {
    pub round: u32,
    pub heroes: Vec<HeroSummary>,
    pub monsters: Vec<MonsterSummary>,
}

/// One attribute changed by a potion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub attribute: Attribute,
    pub amount: i32,
    pub new_value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStarted {
        heroes: Vec<String>,
        monsters: Vec<String>,
    },
    Status(BattleStatus),
    RoundStarted {
        round: u32,
    },
    PhaseStarted {
        phase: BattlePhase,
    },
    TurnStarted {
        hero: String,
        round: u32,
    },
    HeroAttacked {
        hero: String,
        monster: String,
        damage: i32,
        monster_hp: i32,
    },
    MonsterDodged {
        hero: String,
        monster: String,
    },
    SpellCast {
        hero: String,
        spell: String,
        monster: String,
        damage: i32,
        monster_hp: i32,
        mana_spent: i32,
    },
    SpellDodged {
        hero: String,
        spell: String,
        monster: String,
    },
    Debuffed {
        monster: String,
        stat: DebuffTarget,
        value: i32,
    },
    PotionUsed {
        hero: String,
        potion: String,
        changes: Vec<StatChange>,
    },
    WeaponEquipped {
        hero: String,
        weapon: String,
        wielding: String,
    },
    ArmorEquipped {
        hero: String,
        armor: String,
    },
    TurnSkipped {
        hero: String,
    },
    /// An action failed a validity check; the hero picks again.
    ActionRejected {
        hero: String,
        reason: String,
    },
    ActionCancelled {
        hero: String,
    },
    /// A bounded selection was out of range and will be requested again.
    InvalidSelection {
        value: usize,
        max: usize,
    },
    MonsterAttacked {
        monster: String,
        hero: String,
        damage: i32,
        hero_hp: i32,
    },
    HeroDodged {
        monster: String,
        hero: String,
    },
    MonsterDefeated {
        monster: String,
        by: String,
    },
    HeroFainted {
        hero: String,
        by: String,
    },
    Regenerated {
        hero: String,
        hp: i32,
        mp: i32,
    },
    HeroStats {
        heroes: Vec<HeroSummary>,
    },
    MonsterStats {
        monsters: Vec<MonsterSummary>,
    },
    Victory {
        rewards: Rewards,
        rounds: u32,
    },
    RewardGranted {
        hero: String,
        gold: i32,
        exp: i32,
    },
    LeveledUp {
        hero: String,
        level: u32,
    },
    Revived {
        hero: String,
        hp: i32,
        mp: i32,
    },
    Defeat {
        rounds: u32,
    },
}

impl BattleEvent {
    /// Human-readable rendering, possibly several lines.
    pub fn narrate(&self) -> String {
        match self {
            BattleEvent::BattleStarted { heroes, monsters } => format!(
                "A battle begins! {} versus {}.",
                heroes.join(", "),
                monsters.join(", ")
            ),
            BattleEvent::Status(status) => narrate_status(status),
            BattleEvent::RoundStarted { round } => format!("=== Round {round} ==="),
            BattleEvent::PhaseStarted { phase } => format!("--- {phase} ---"),
            BattleEvent::TurnStarted { hero, .. } => format!("{hero}'s turn."),
            BattleEvent::HeroAttacked {
                hero,
                monster,
                damage,
                monster_hp,
            } => format!("{hero} hits {monster} for {damage} damage ({monster} HP: {monster_hp})."),
            BattleEvent::MonsterDodged { hero, monster } => {
                format!("{monster} dodged {hero}'s attack!")
            }
            BattleEvent::SpellCast {
                hero,
                spell,
                monster,
                damage,
                monster_hp,
                mana_spent,
            } => format!(
                "{hero} casts {spell} ({mana_spent} MP) on {monster} for {damage} damage ({monster} HP: {monster_hp})."
            ),
            BattleEvent::SpellDodged {
                hero,
                spell,
                monster,
            } => format!("{monster} dodged {hero}'s {spell}! The spell is spent."),
            BattleEvent::Debuffed {
                monster,
                stat,
                value,
            } => format!("{monster}'s {stat} drops to {value}."),
            BattleEvent::PotionUsed {
                hero,
                potion,
                changes,
            } => {
                let parts: Vec<String> = changes
                    .iter()
                    .map(|c| format!("{} +{} -> {}", c.attribute, c.amount, c.new_value))
                    .collect();
                format!("{hero} drinks {potion}: {}.", parts.join(", "))
            }
            BattleEvent::WeaponEquipped {
                hero,
                weapon,
                wielding,
            } => format!("{hero} equips {weapon}. Now wielding: {wielding}."),
            BattleEvent::ArmorEquipped { hero, armor } => format!("{hero} puts on {armor}."),
            BattleEvent::TurnSkipped { hero } => format!("{hero} skips the turn."),
            BattleEvent::ActionRejected { reason, .. } => format!("{reason}."),
            BattleEvent::ActionCancelled { .. } => "Cancelled.".to_string(),
            BattleEvent::InvalidSelection { value, max } => {
                format!("Invalid choice {value}: enter a number from 0 to {max}.")
            }
            BattleEvent::MonsterAttacked {
                monster,
                hero,
                damage,
                hero_hp,
            } => format!("{monster} hits {hero} for {damage} damage ({hero} HP: {hero_hp})."),
            BattleEvent::HeroDodged { monster, hero } => {
                format!("{hero} dodged {monster}'s attack!")
            }
            BattleEvent::MonsterDefeated { monster, by } => {
                format!("{monster} has been defeated by {by}!")
            }
            BattleEvent::HeroFainted { hero, by } => format!("{hero} was knocked out by {by}!"),
            BattleEvent::Regenerated { hero, hp, mp } => {
                format!("{hero} recovers to HP {hp}, MP {mp}.")
            }
            BattleEvent::HeroStats { heroes } => heroes
                .iter()
                .map(narrate_hero)
                .collect::<Vec<_>>()
                .join("\n"),
            BattleEvent::MonsterStats { monsters } => monsters
                .iter()
                .map(narrate_monster)
                .collect::<Vec<_>>()
                .join("\n"),
            BattleEvent::Victory { rewards, rounds } => format!(
                "Victory after {rounds} round(s)! Each standing hero earns {} gold and {} exp.",
                rewards.gold, rewards.exp
            ),
            BattleEvent::RewardGranted { hero, gold, exp } => {
                format!("{hero} gains {gold} gold and {exp} exp.")
            }
            BattleEvent::LeveledUp { hero, level } => format!("{hero} reached level {level}!"),
            BattleEvent::Revived { hero, hp, mp } => {
                format!("{hero} is revived with HP {hp}, MP {mp}.")
            }
            BattleEvent::Defeat { rounds } => {
                format!("The party has fallen after {rounds} round(s).")
            }
        }
    }
}

fn narrate_hero(h: &HeroSummary) -> String {
    format!(
        "{} [{} Lv {}] HP {}/{} MP {}/{} str {} dex {} agi {} gold {} exp {} | weapons: {} | armor: {}",
        h.name,
        h.class,
        h.level,
        h.hp,
        h.base_hp,
        h.mp,
        h.base_mp,
        h.strength,
        h.dexterity,
        h.agility,
        h.gold,
        h.exp,
        h.weapons,
        h.armor
    )
}

fn narrate_monster(m: &MonsterSummary) -> String {
    format!(
        "{} [{} Lv {}] HP {}/{} dmg {} def {} dodge {}",
        m.name, m.kind, m.level, m.hp, m.base_hp, m.damage, m.defense, m.dodge
    )
}

fn narrate_status(status: &BattleStatus) -> String {
    let mut lines = vec![format!("Status (round {}):", status.round)];
    lines.extend(status.heroes.iter().map(|h| format!("  {}", narrate_hero(h))));
    lines.extend(status.monsters.iter().map(|m| format!("  {}", narrate_monster(m))));
    lines.join("\n")
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.narrate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = BattleEvent::HeroAttacked {
            hero: "Gaerdal_Ironhand".into(),
            monster: "Natsunomeryu".into(),
            damage: 42,
            monster_hp: 158,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "hero_attacked");
        assert_eq!(json["damage"], 42);
    }

    #[test]
    fn test_status_serializes_inline() {
        let event = BattleEvent::Status(BattleStatus {
            round: 2,
            heroes: vec![],
            monsters: vec![],
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "status");
        assert_eq!(json["round"], 2);
    }

    #[test]
    fn test_narrate_attack() {
        let event = BattleEvent::MonsterDodged {
            hero: "Rillifane".into(),
            monster: "Chrysophylax".into(),
        };
        assert_eq!(event.narrate(), "Chrysophylax dodged Rillifane's attack!");
    }
}
