//! Buying and selling items.

use crate::hero::Hero;
use crate::items::{Item, ItemId};
use thiserror::Error;
use tracing::info;

/// Errors from market transactions. A failed transaction changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    #[error("{item} requires level {required}, {hero} is level {level}")]
    LevelTooLow {
        hero: String,
        item: String,
        required: u32,
        level: u32,
    },

    #[error("{item} costs {price} gold, {hero} has {gold}")]
    InsufficientGold {
        hero: String,
        item: String,
        price: i32,
        gold: i32,
    },

    #[error("The market has no item {0}")]
    NoSuchItem(usize),

    #[error("{hero} does not own that item")]
    NotOwned { hero: String },
}

/// A shop with unlimited copies of every item in its stock.
#[derive(Debug, Clone, Default)]
pub struct Market {
    stock: Vec<Item>,
}

impl Market {
    pub fn new(stock: Vec<Item>) -> Self {
        Self { stock }
    }

    pub fn stock(&self) -> &[Item] {
        &self.stock
    }

    /// What selling an item returns.
    pub fn sell_price(item: &Item) -> i32 {
        item.price() / 2
    }

    /// Buy stock item `index` for `hero`. Returns the new item's id.
    pub fn buy(&self, hero: &mut Hero, index: usize) -> Result<ItemId, MarketError> {
        let item = self.stock.get(index).ok_or(MarketError::NoSuchItem(index))?;

        if hero.level() < item.level() {
            return Err(MarketError::LevelTooLow {
                hero: hero.name().to_string(),
                item: item.name().to_string(),
                required: item.level(),
                level: hero.level(),
            });
        }
        if !hero.spend_gold(item.price()) {
            return Err(MarketError::InsufficientGold {
                hero: hero.name().to_string(),
                item: item.name().to_string(),
                price: item.price(),
                gold: hero.gold(),
            });
        }

        info!(hero = %hero.name(), item = %item.name(), price = item.price(), "item bought");
        Ok(hero.inventory_mut().add(item.instantiate()))
    }

    /// Sell an item from the hero's inventory for half its price, unequipping it first.
    pub fn sell(&self, hero: &mut Hero, id: ItemId) -> Result<i32, MarketError> {
        let Some(item) = hero.inventory_mut().remove(id) else {
            return Err(MarketError::NotOwned {
                hero: hero.name().to_string(),
            });
        };
        hero.equipment_mut().unequip(id);

        let gold = Self::sell_price(&item);
        hero.add_gold(gold);
        info!(hero = %hero.name(), item = %item.name(), gold, "item sold");
        Ok(gold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_axe, sample_potion, sample_sword, sample_warrior};

    fn market() -> Market {
        Market::new(vec![sample_sword().into(), sample_axe().into(), sample_potion().into()])
    }

    #[test]
    fn test_buy_gives_fresh_instance() {
        let market = market();
        let mut hero = sample_warrior("Gaerdal_Ironhand");
        let first = market.buy(&mut hero, 2).unwrap();
        let second = market.buy(&mut hero, 2).unwrap();
        assert_ne!(first, second);
        assert_ne!(first, market.stock()[2].id());
        assert_eq!(hero.gold(), 1354 - 500);
        assert_eq!(hero.inventory().potions().count(), 2);
    }

    #[test]
    fn test_buy_requires_level() {
        let market = market();
        let mut hero = sample_warrior("Gaerdal_Ironhand");
        let err = market.buy(&mut hero, 1).unwrap_err();
        assert!(matches!(err, MarketError::LevelTooLow { required: 5, level: 1, .. }));
        assert_eq!(hero.gold(), 1354);
        assert!(hero.inventory().is_empty());
    }

    #[test]
    fn test_buy_requires_gold() {
        let market = market();
        let mut hero = sample_warrior("Gaerdal_Ironhand");
        hero.spend_gold(1000);
        let err = market.buy(&mut hero, 0).unwrap_err();
        assert_eq!(
            err,
            MarketError::InsufficientGold {
                hero: "Gaerdal_Ironhand".into(),
                item: "Sword".into(),
                price: 500,
                gold: 354,
            }
        );
        assert!(market.buy(&mut hero, 9).is_err());
    }

    #[test]
    fn test_sell_pays_half_and_unequips() {
        let market = market();
        let mut hero = sample_warrior("Gaerdal_Ironhand");
        let id = market.buy(&mut hero, 0).unwrap();
        let sword = hero.inventory().weapons().next().cloned();
        hero.equip_weapon(sword);
        assert_eq!(hero.equipped_weapon_damage(), 800);

        assert_eq!(market.sell(&mut hero, id), Ok(250));
        assert_eq!(hero.gold(), 1354 - 500 + 250);
        assert_eq!(hero.equipped_weapon_damage(), 0);
        assert!(matches!(market.sell(&mut hero, id), Err(MarketError::NotOwned { .. })));
    }
}
