//! Hero inventory and equipment slots.

use crate::items::{Armor, Item, ItemId, Potion, Spell, Weapon};
use serde::{Deserialize, Serialize};

/// Insertion-ordered bag of items.
///
/// Equipped weapons and armor stay listed here; equipment holds its own copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<Item>) -> ItemId {
        let item = item.into();
        let id = item.id();
        self.items.push(item);
        id
    }

    /// Remove an item by id, preserving the order of the rest.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.items.iter().filter_map(|i| match i {
            Item::Weapon(w) => Some(w),
            _ => None,
        })
    }

    pub fn armors(&self) -> impl Iterator<Item = &Armor> {
        self.items.iter().filter_map(|i| match i {
            Item::Armor(a) => Some(a),
            _ => None,
        })
    }

    pub fn potions(&self) -> impl Iterator<Item = &Potion> {
        self.items.iter().filter_map(|i| match i {
            Item::Potion(p) => Some(p),
            _ => None,
        })
    }

    pub fn spells(&self) -> impl Iterator<Item = &Spell> {
        self.items.iter().filter_map(|i| match i {
            Item::Spell(s) => Some(s),
            _ => None,
        })
    }
}

/// What a hero is actively wielding and wearing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    main_hand: Option<Weapon>,
    off_hand: Option<Weapon>,
    armor: Option<Armor>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_hand(&self) -> Option<&Weapon> {
        self.main_hand.as_ref()
    }

    pub fn off_hand(&self) -> Option<&Weapon> {
        self.off_hand.as_ref()
    }

    pub fn armor(&self) -> Option<&Armor> {
        self.armor.as_ref()
    }

    /// Put a weapon in hand. Returns false (and changes nothing) for `None`.
    ///
    /// Two-handed weapons take the main hand and empty the off hand. A
    /// one-handed weapon replaces a two-hander, otherwise fills the main hand,
    /// then the off hand, and with both hands full replaces the main hand.
    pub fn equip_weapon(&mut self, weapon: Option<Weapon>) -> bool {
        let Some(weapon) = weapon else {
            return false;
        };

        if weapon.is_two_handed() {
            self.main_hand = Some(weapon);
            self.off_hand = None;
            return true;
        }

        let wielding_two_hander = self.main_hand.as_ref().is_some_and(Weapon::is_two_handed);
        if wielding_two_hander {
            self.main_hand = Some(weapon);
            self.off_hand = None;
        } else if self.main_hand.is_none() {
            self.main_hand = Some(weapon);
        } else if self.off_hand.is_none() {
            self.off_hand = Some(weapon);
        } else {
            self.main_hand = Some(weapon);
        }
        true
    }

    pub fn set_armor(&mut self, armor: Option<Armor>) {
        self.armor = armor;
    }

    /// Combined damage of both hands.
    pub fn weapon_damage(&self) -> i32 {
        self.main_hand.iter().chain(self.off_hand.iter()).map(|w| w.damage).sum()
    }

    pub fn armor_reduction(&self) -> i32 {
        self.armor.as_ref().map_or(0, |a| a.damage_reduction)
    }

    pub fn is_equipped(&self, id: ItemId) -> bool {
        self.main_hand.as_ref().is_some_and(|w| w.id == id)
            || self.off_hand.as_ref().is_some_and(|w| w.id == id)
            || self.armor.as_ref().is_some_and(|a| a.id == id)
    }

    /// Clear whichever slot holds `id`. Returns true if something was removed.
    pub fn unequip(&mut self, id: ItemId) -> bool {
        if self.main_hand.as_ref().is_some_and(|w| w.id == id) {
            self.main_hand = None;
            return true;
        }
        if self.off_hand.as_ref().is_some_and(|w| w.id == id) {
            self.off_hand = None;
            return true;
        }
        if self.armor.as_ref().is_some_and(|a| a.id == id) {
            self.armor = None;
            return true;
        }
        false
    }

    /// Human-readable description of the wielded weapons.
    pub fn weapons_label(&self) -> String {
        match (&self.main_hand, &self.off_hand) {
            (None, None) => "none".to_string(),
            (Some(main), None) => format!("{} ({}H)", main.name, main.hands.count()),
            (None, Some(off)) => format!("{} ({}H)", off.name, off.hands.count()),
            (Some(main), Some(off)) => format!(
                "{} ({}H), {} ({}H)",
                main.name,
                main.hands.count(),
                off.name,
                off.hands.count()
            ),
        }
    }

    pub fn armor_label(&self) -> String {
        self.armor
            .as_ref()
            .map_or_else(|| "none".to_string(), |a| a.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Element, Hands};

    fn one_hander(name: &str, damage: i32) -> Weapon {
        Weapon::new(name, 100, 1, damage, Hands::One)
    }

    fn two_hander(name: &str, damage: i32) -> Weapon {
        Weapon::new(name, 100, 1, damage, Hands::Two)
    }

    #[test]
    fn test_equip_none_fails() {
        let mut eq = Equipment::new();
        assert!(!eq.equip_weapon(None));
        assert!(eq.main_hand().is_none());
        assert!(eq.off_hand().is_none());
    }

    #[test]
    fn test_two_hander_then_two_one_handers() {
        let mut eq = Equipment::new();
        assert!(eq.equip_weapon(Some(two_hander("Axe", 850))));
        assert!(eq.equip_weapon(Some(one_hander("Sword", 800))));
        assert_eq!(eq.main_hand().map(|w| w.name.as_str()), Some("Sword"));
        assert!(eq.off_hand().is_none());

        assert!(eq.equip_weapon(Some(one_hander("Dagger", 250))));
        assert_eq!(eq.main_hand().map(|w| w.name.as_str()), Some("Sword"));
        assert_eq!(eq.off_hand().map(|w| w.name.as_str()), Some("Dagger"));
        assert_eq!(eq.weapon_damage(), 1050);
    }

    #[test]
    fn test_third_one_hander_replaces_main() {
        let mut eq = Equipment::new();
        eq.equip_weapon(Some(one_hander("A", 1)));
        eq.equip_weapon(Some(one_hander("B", 2)));
        eq.equip_weapon(Some(one_hander("C", 3)));
        assert_eq!(eq.main_hand().map(|w| w.name.as_str()), Some("C"));
        assert_eq!(eq.off_hand().map(|w| w.name.as_str()), Some("B"));
    }

    #[test]
    fn test_two_hander_clears_off_hand() {
        let mut eq = Equipment::new();
        eq.equip_weapon(Some(one_hander("A", 1)));
        eq.equip_weapon(Some(one_hander("B", 2)));
        eq.equip_weapon(Some(two_hander("Bow", 500)));
        assert_eq!(eq.main_hand().map(|w| w.name.as_str()), Some("Bow"));
        assert!(eq.off_hand().is_none());
        assert_eq!(eq.weapon_damage(), 500);
        assert_eq!(eq.weapons_label(), "Bow (2H)");
    }

    #[test]
    fn test_armor_slot() {
        let mut eq = Equipment::new();
        assert_eq!(eq.armor_reduction(), 0);
        let plate = Armor::new("Full_Body_Armor", 1000, 8, 1100);
        let plate_id = plate.id;
        eq.set_armor(Some(plate));
        assert_eq!(eq.armor_reduction(), 1100);
        assert!(eq.is_equipped(plate_id));
        eq.set_armor(Some(Armor::new("Wizard_Shield", 1200, 10, 1500)));
        assert_eq!(eq.armor_reduction(), 1500);
        assert!(!eq.is_equipped(plate_id));
    }

    #[test]
    fn test_unequip_by_id() {
        let mut eq = Equipment::new();
        let sword = one_hander("Sword", 800);
        let id = sword.id;
        eq.equip_weapon(Some(sword));
        assert!(eq.unequip(id));
        assert!(!eq.unequip(id));
        assert_eq!(eq.weapon_damage(), 0);
    }

    #[test]
    fn test_inventory_keeps_insertion_order() {
        let mut inv = Inventory::new();
        inv.add(Spell::new("Heat_Wave", Element::Fire, 450, 2, 600, 150));
        let potion = inv.add(Potion::new("Healing_Potion", 250, 1, 100, "Health"));
        inv.add(Spell::new("Snow_Cannon", Element::Ice, 500, 2, 650, 250));

        let names: Vec<_> = inv.spells().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Heat_Wave", "Snow_Cannon"]);

        assert!(inv.remove(potion).is_some());
        assert!(inv.remove(potion).is_none());
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.potions().count(), 0);
    }

    #[test]
    fn test_duplicate_templates_are_distinct() {
        let mut inv = Inventory::new();
        let potion = Item::from(Potion::new("Magic_Potion", 350, 2, 100, "Mana"));
        let first = inv.add(potion.instantiate());
        inv.add(potion.instantiate());
        inv.remove(first);
        assert_eq!(inv.potions().count(), 1);
    }
}
