//! The ordered group of heroes the player controls.

use crate::hero::Hero;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Largest party the game allows.
pub const MAX_PARTY_SIZE: usize = 3;

/// Errors from forming a party.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartyError {
    #[error("A party needs at least one hero")]
    Empty,

    #[error("Too many heroes: {count} (maximum {max})")]
    TooMany { count: usize, max: usize },

    #[error("Duplicate hero name: {0}")]
    DuplicateName(String),
}

/// One to three heroes in a fixed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    members: Vec<Hero>,
}

impl Party {
    pub fn new(members: Vec<Hero>) -> Result<Self, PartyError> {
        if members.is_empty() {
            return Err(PartyError::Empty);
        }
        if members.len() > MAX_PARTY_SIZE {
            return Err(PartyError::TooMany {
                count: members.len(),
                max: MAX_PARTY_SIZE,
            });
        }

        let mut seen = HashSet::new();
        for hero in &members {
            if !seen.insert(hero.name()) {
                return Err(PartyError::DuplicateName(hero.name().to_string()));
            }
        }

        Ok(Self { members })
    }

    pub fn members(&self) -> &[Hero] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&Hero> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Hero> {
        self.members.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hero> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Hero> {
        self.members.iter_mut()
    }

    /// Indices of heroes that have not fainted, in party order.
    pub fn living_indices(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_fainted())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_living(&self) -> bool {
        self.members.iter().any(|h| !h.is_fainted())
    }

    /// Mean hero level, used to pick fair encounters.
    pub fn mean_level(&self) -> f64 {
        let total: u32 = self.members.iter().map(Hero::level).sum();
        f64::from(total) / self.members.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::{HeroClass, HeroSpec};

    fn hero(name: &str) -> Hero {
        Hero::new(HeroSpec::new(name, HeroClass::Warrior))
    }

    #[test]
    fn test_party_size_limits() {
        assert_eq!(Party::new(vec![]).unwrap_err(), PartyError::Empty);
        let err = Party::new(vec![hero("a"), hero("b"), hero("c"), hero("d")]).unwrap_err();
        assert_eq!(err, PartyError::TooMany { count: 4, max: 3 });
        assert!(Party::new(vec![hero("a"), hero("b"), hero("c")]).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Party::new(vec![hero("Flandal"), hero("Flandal")]).unwrap_err();
        assert_eq!(err, PartyError::DuplicateName("Flandal".to_string()));
    }

    #[test]
    fn test_living_indices_skip_fainted() {
        let mut party = Party::new(vec![hero("a"), hero("b"), hero("c")]).unwrap();
        party.get_mut(1).unwrap().take_damage(1000);
        assert_eq!(party.living_indices(), vec![0, 2]);
        assert!(party.has_living());

        party.get_mut(0).unwrap().take_damage(1000);
        party.get_mut(2).unwrap().take_damage(1000);
        assert!(!party.has_living());
    }

    #[test]
    fn test_mean_level() {
        let mut party = Party::new(vec![hero("a"), hero("b")]).unwrap();
        party.get_mut(0).unwrap().level_up();
        assert!((party.mean_level() - 1.5).abs() < 1e-12);
    }
}
