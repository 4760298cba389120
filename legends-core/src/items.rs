//! Item model: weapons, armor, potions and spells.
//!
//! Every item instance carries an [`ItemId`] so the same template can sit in
//! several inventories (or twice in one) and still be equipped, consumed or
//! sold individually.

use crate::monster::DebuffTarget;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an item instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many hands a weapon occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hands {
    One,
    Two,
}

impl Hands {
    pub fn from_count(count: i32) -> Option<Hands> {
        match count {
            1 => Some(Hands::One),
            2 => Some(Hands::Two),
            _ => None,
        }
    }

    pub fn count(&self) -> u8 {
        match self {
            Hands::One => 1,
            Hands::Two => 2,
        }
    }
}

/// Spell element. Each element weakens a different monster stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Lightning,
}

impl Element {
    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Ice => "Ice",
            Element::Lightning => "Lightning",
        }
    }

    /// The monster stat this element's debuff reduces.
    pub fn debuff_target(&self) -> DebuffTarget {
        match self {
            Element::Fire => DebuffTarget::Defense,
            Element::Ice => DebuffTarget::Damage,
            Element::Lightning => DebuffTarget::Dodge,
        }
    }

    pub fn all() -> [Element; 3] {
        [Element::Fire, Element::Ice, Element::Lightning]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Hero attribute a potion can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Health,
    Mana,
    Strength,
    Dexterity,
    Agility,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Health,
        Attribute::Mana,
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Agility,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Health => "HP",
            Attribute::Mana => "MP",
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Agility => "Agility",
        }
    }

    /// Lowercase substrings that select this attribute in potion data.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Attribute::Health => &["health", "hp"],
            Attribute::Mana => &["mana", "mp"],
            Attribute::Strength => &["strength"],
            Attribute::Dexterity => &["dexterity"],
            Attribute::Agility => &["agility"],
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: ItemId,
    pub name: String,
    pub price: i32,
    pub level: u32,
    pub damage: i32,
    pub hands: Hands,
}

impl Weapon {
    pub fn new(name: impl Into<String>, price: i32, level: u32, damage: i32, hands: Hands) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            price,
            level,
            damage,
            hands,
        }
    }

    pub fn is_two_handed(&self) -> bool {
        self.hands == Hands::Two
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub id: ItemId,
    pub name: String,
    pub price: i32,
    pub level: u32,
    pub damage_reduction: i32,
}

impl Armor {
    pub fn new(name: impl Into<String>, price: i32, level: u32, damage_reduction: i32) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            price,
            level,
            damage_reduction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potion {
    pub id: ItemId,
    pub name: String,
    pub price: i32,
    pub level: u32,
    /// Amount added to every affected attribute.
    pub amount: i32,
    /// Free-text attribute field as it appears in the data files.
    pub attribute: String,
}

impl Potion {
    pub fn new(
        name: impl Into<String>,
        price: i32,
        level: u32,
        amount: i32,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            price,
            level,
            amount,
            attribute: attribute.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: ItemId,
    pub name: String,
    pub price: i32,
    pub level: u32,
    pub damage: i32,
    pub mana_cost: i32,
    pub element: Element,
}

impl Spell {
    pub fn new(
        name: impl Into<String>,
        element: Element,
        price: i32,
        level: u32,
        damage: i32,
        mana_cost: i32,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            price,
            level,
            damage,
            mana_cost,
            element,
        }
    }
}

/// Item category, used for filtering and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Spell,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potion",
            ItemKind::Spell => "spell",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Anything a hero can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
    Spell(Spell),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Weapon(w) => w.id,
            Item::Armor(a) => a.id,
            Item::Potion(p) => p.id,
            Item::Spell(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Weapon(w) => &w.name,
            Item::Armor(a) => &a.name,
            Item::Potion(p) => &p.name,
            Item::Spell(s) => &s.name,
        }
    }

    pub fn price(&self) -> i32 {
        match self {
            Item::Weapon(w) => w.price,
            Item::Armor(a) => a.price,
            Item::Potion(p) => p.price,
            Item::Spell(s) => s.price,
        }
    }

    /// Minimum hero level needed to buy this item.
    pub fn level(&self) -> u32 {
        match self {
            Item::Weapon(w) => w.level,
            Item::Armor(a) => a.level,
            Item::Potion(p) => p.level,
            Item::Spell(s) => s.level,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Weapon(_) => ItemKind::Weapon,
            Item::Armor(_) => ItemKind::Armor,
            Item::Potion(_) => ItemKind::Potion,
            Item::Spell(_) => ItemKind::Spell,
        }
    }

    /// Potions and spells are used up; weapons and armor are not.
    pub fn is_consumable(&self) -> bool {
        matches!(self, Item::Potion(_) | Item::Spell(_))
    }

    /// A copy of this item with a fresh identity, e.g. when a market sells it.
    pub fn instantiate(&self) -> Item {
        let mut copy = self.clone();
        let id = ItemId::new();
        match &mut copy {
            Item::Weapon(w) => w.id = id,
            Item::Armor(a) => a.id = id,
            Item::Potion(p) => p.id = id,
            Item::Spell(s) => s.id = id,
        }
        copy
    }

    /// One-line summary of the item's stats, used in listings.
    pub fn summary(&self) -> String {
        match self {
            Item::Weapon(w) => format!("dmg {} ({}H)", w.damage, w.hands.count()),
            Item::Armor(a) => format!("reduction {}", a.damage_reduction),
            Item::Potion(p) => format!("+{} {}", p.amount, p.attribute),
            Item::Spell(s) => format!("{} dmg {}, {} MP", s.element, s.damage, s.mana_cost),
        }
    }
}

impl From<Weapon> for Item {
    fn from(weapon: Weapon) -> Self {
        Item::Weapon(weapon)
    }
}

impl From<Armor> for Item {
    fn from(armor: Armor) -> Self {
        Item::Armor(armor)
    }
}

impl From<Potion> for Item {
    fn from(potion: Potion) -> Self {
        Item::Potion(potion)
    }
}

impl From<Spell> for Item {
    fn from(spell: Spell) -> Self {
        Item::Spell(spell)
    }
}
