//! Loading heroes, monsters and items from flat data files.
//!
//! Every file has one header line followed by whitespace-separated records.
//! Blank lines are ignored. Record layouts:
//!
//! | file                    | fields                                        |
//! |-------------------------|-----------------------------------------------|
//! | Paladins, Sorcerers, Warriors | `name mana strength agility dexterity gold exp` |
//! | Dragons, Exoskeletons, Spirits | `name level damage defense dodge`    |
//! | Weaponry                | `name price level damage hands`               |
//! | Armory                  | `name price level reduction`                  |
//! | Potions                 | `name price level amount attribute`           |
//! | Fire/Ice/LightningSpells | `name price level damage mana_cost`          |

use crate::hero::{Hero, HeroClass, HeroSpec};
use crate::items::{Armor, Element, Hands, Item, Potion, Spell, Weapon};
use crate::monster::{CombatStats, Monster, MonsterKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading data files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: expected {expected} fields, found {found}")]
    MissingFields {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{file}:{line}: invalid {field} '{value}'")]
    InvalidNumber {
        file: String,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("{file}:{line}: a weapon takes 1 or 2 hands, not {value}")]
    InvalidHands { file: String, line: usize, value: i32 },

    #[error("No {0} found in the data directory")]
    EmptyRoster(&'static str),
}

pub fn hero_file(class: HeroClass) -> &'static str {
    match class {
        HeroClass::Paladin => "Paladins.txt",
        HeroClass::Sorcerer => "Sorcerers.txt",
        HeroClass::Warrior => "Warriors.txt",
    }
}

pub fn monster_file(kind: MonsterKind) -> &'static str {
    match kind {
        MonsterKind::Dragon => "Dragons.txt",
        MonsterKind::Exoskeleton => "Exoskeletons.txt",
        MonsterKind::Spirit => "Spirits.txt",
    }
}

pub fn spell_file(element: Element) -> &'static str {
    match element {
        Element::Fire => "FireSpells.txt",
        Element::Ice => "IceSpells.txt",
        Element::Lightning => "LightningSpells.txt",
    }
}

pub const WEAPON_FILE: &str = "Weaponry.txt";
pub const ARMOR_FILE: &str = "Armory.txt";
pub const POTION_FILE: &str = "Potions.txt";

/// One data line split into fields.
struct Record<'a> {
    file: &'a str,
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn require(&self, expected: usize) -> Result<(), LoadError> {
        if self.fields.len() < expected {
            return Err(LoadError::MissingFields {
                file: self.file.to_string(),
                line: self.line,
                expected,
                found: self.fields.len(),
            });
        }
        Ok(())
    }

    fn text(&self, index: usize) -> &'a str {
        self.fields[index]
    }

    fn int(&self, index: usize, field: &'static str) -> Result<i32, LoadError> {
        self.fields[index].parse().map_err(|_| self.invalid(index, field))
    }

    fn level(&self, index: usize) -> Result<u32, LoadError> {
        self.fields[index].parse().map_err(|_| self.invalid(index, "level"))
    }

    fn invalid(&self, index: usize, field: &'static str) -> LoadError {
        LoadError::InvalidNumber {
            file: self.file.to_string(),
            line: self.line,
            field,
            value: self.fields[index].to_string(),
        }
    }

    fn warn_extra(&self, expected: usize) {
        if self.fields.len() > expected {
            warn!(
                file = self.file,
                line = self.line,
                extra = self.fields.len() - expected,
                "ignoring extra fields"
            );
        }
    }
}

/// Data lines of a file: header skipped, blank lines dropped, 1-based line numbers.
fn records<'a>(file: &'a str, text: &'a str) -> impl Iterator<Item = Record<'a>> + 'a {
    text.lines()
        .enumerate()
        .skip(1)
        .map(move |(i, line)| Record {
            file,
            line: i + 1,
            fields: line.split_whitespace().collect(),
        })
        .filter(|r| !r.fields.is_empty())
}

pub fn parse_heroes(class: HeroClass, file: &str, text: &str) -> Result<Vec<Hero>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(7)?;
            r.warn_extra(7);
            Ok(Hero::new(HeroSpec {
                mana: r.int(1, "mana")?,
                strength: r.int(2, "strength")?,
                agility: r.int(3, "agility")?,
                dexterity: r.int(4, "dexterity")?,
                gold: r.int(5, "gold")?,
                exp: r.int(6, "exp")?,
                ..HeroSpec::new(r.text(0), class)
            }))
        })
        .collect()
}

pub fn parse_monsters(kind: MonsterKind, file: &str, text: &str) -> Result<Vec<Monster>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(5)?;
            r.warn_extra(5);
            let stats = CombatStats::new(
                r.int(2, "damage")?,
                r.int(3, "defense")?,
                r.int(4, "dodge")?,
            );
            Ok(Monster::new(kind, r.text(0), r.level(1)?, stats))
        })
        .collect()
}

pub fn parse_weapons(file: &str, text: &str) -> Result<Vec<Weapon>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(5)?;
            r.warn_extra(5);
            let count = r.int(4, "hands")?;
            let hands = Hands::from_count(count).ok_or_else(|| LoadError::InvalidHands {
                file: file.to_string(),
                line: r.line,
                value: count,
            })?;
            Ok(Weapon::new(
                r.text(0),
                r.int(1, "price")?,
                r.level(2)?,
                r.int(3, "damage")?,
                hands,
            ))
        })
        .collect()
}

pub fn parse_armors(file: &str, text: &str) -> Result<Vec<Armor>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(4)?;
            r.warn_extra(4);
            Ok(Armor::new(
                r.text(0),
                r.int(1, "price")?,
                r.level(2)?,
                r.int(3, "damage reduction")?,
            ))
        })
        .collect()
}

/// The attribute column may contain spaces; everything after the amount is kept.
pub fn parse_potions(file: &str, text: &str) -> Result<Vec<Potion>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(5)?;
            Ok(Potion::new(
                r.text(0),
                r.int(1, "price")?,
                r.level(2)?,
                r.int(3, "amount")?,
                r.fields[4..].join(" "),
            ))
        })
        .collect()
}

pub fn parse_spells(element: Element, file: &str, text: &str) -> Result<Vec<Spell>, LoadError> {
    records(file, text)
        .map(|r| {
            r.require(5)?;
            r.warn_extra(5);
            Ok(Spell::new(
                r.text(0),
                element,
                r.int(1, "price")?,
                r.level(2)?,
                r.int(3, "damage")?,
                r.int(4, "mana cost")?,
            ))
        })
        .collect()
}

fn read(dir: &Path, file: &str) -> Result<String, LoadError> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
}

/// Every hero, monster template and market item in a data directory.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub heroes: Vec<Hero>,
    pub monsters: Vec<Monster>,
    pub weapons: Vec<Weapon>,
    pub armors: Vec<Armor>,
    pub potions: Vec<Potion>,
    pub spells: Vec<Spell>,
}

impl GameData {
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut data = GameData::default();

        for class in HeroClass::all() {
            let file = hero_file(class);
            data.heroes.extend(parse_heroes(class, file, &read(dir, file)?)?);
        }
        for kind in MonsterKind::all() {
            let file = monster_file(kind);
            data.monsters.extend(parse_monsters(kind, file, &read(dir, file)?)?);
        }
        for element in Element::all() {
            let file = spell_file(element);
            data.spells.extend(parse_spells(element, file, &read(dir, file)?)?);
        }
        data.weapons = parse_weapons(WEAPON_FILE, &read(dir, WEAPON_FILE)?)?;
        data.armors = parse_armors(ARMOR_FILE, &read(dir, ARMOR_FILE)?)?;
        data.potions = parse_potions(POTION_FILE, &read(dir, POTION_FILE)?)?;

        if data.heroes.is_empty() {
            return Err(LoadError::EmptyRoster("heroes"));
        }
        if data.monsters.is_empty() {
            return Err(LoadError::EmptyRoster("monsters"));
        }

        debug!(
            heroes = data.heroes.len(),
            monsters = data.monsters.len(),
            items = data.weapons.len() + data.armors.len() + data.potions.len() + data.spells.len(),
            "game data loaded"
        );
        Ok(data)
    }

    pub fn heroes_of(&self, class: HeroClass) -> impl Iterator<Item = &Hero> {
        self.heroes.iter().filter(move |h| h.class() == class)
    }

    /// Everything the market sells, grouped by kind.
    pub fn market_stock(&self) -> Vec<Item> {
        let weapons = self.weapons.iter().cloned().map(Item::from);
        let armors = self.armors.iter().cloned().map(Item::from);
        let potions = self.potions.iter().cloned().map(Item::from);
        let spells = self.spells.iter().cloned().map(Item::from);
        weapons.chain(armors).chain(potions).chain(spells).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heroes_skips_header_and_blanks() {
        let text = "Name/mana/strength/agility/dexterity/starting money/starting experience\n\
                    Gaerdal_Ironhand 100 700 500 600 1354 7\n\
                    \n\
                    Sehanine_Monnbow 600 700 800 500 2500 8\n";
        let heroes = parse_heroes(HeroClass::Warrior, "Warriors.txt", text).unwrap();
        assert_eq!(heroes.len(), 2);
        let h = &heroes[0];
        assert_eq!(h.name(), "Gaerdal_Ironhand");
        assert_eq!(h.level(), 1);
        assert_eq!(h.base_hp(), 100);
        assert_eq!(h.mp(), 100);
        assert_eq!((h.strength(), h.agility(), h.dexterity()), (700, 500, 600));
        assert_eq!((h.gold(), h.exp()), (1354, 7));
        assert_eq!(h.class(), HeroClass::Warrior);
    }

    #[test]
    fn test_parse_monsters() {
        let text = "Name/level/damage/defense/dodge chance\nDesghidorrah 3 300 400 35\n";
        let monsters = parse_monsters(MonsterKind::Dragon, "Dragons.txt", text).unwrap();
        assert_eq!(monsters[0].base_hp(), 300);
        assert_eq!(monsters[0].live_stats(), CombatStats::new(300, 400, 35));
    }

    #[test]
    fn test_invalid_hands() {
        let text = "header\nSword 500 1 800 3\n";
        let err = parse_weapons("Weaponry.txt", text).unwrap_err();
        assert!(matches!(err, LoadError::InvalidHands { line: 2, value: 3, .. }));
    }

    #[test]
    fn test_missing_fields_names_file_and_line() {
        let text = "header\nPlatinum_Shield 150 1 200\nBroken 10\n";
        let err = parse_armors("Armory.txt", text).unwrap_err();
        assert_eq!(err.to_string(), "Armory.txt:3: expected 4 fields, found 2");
    }

    #[test]
    fn test_invalid_number() {
        let text = "header\nFlame_Tornado 700 four 850 300\n";
        let err = parse_spells(Element::Fire, "FireSpells.txt", text).unwrap_err();
        assert_eq!(err.to_string(), "FireSpells.txt:2: invalid level 'four'");
    }

    #[test]
    fn test_potion_attribute_keeps_rest_of_line() {
        let text = "header\nAmbrosia 1000 8 150 All Health/Mana/Strength\n";
        let potions = parse_potions("Potions.txt", text).unwrap();
        assert_eq!(potions[0].attribute, "All Health/Mana/Strength");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = GameData::load_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
