//! Identity and resource pools shared by heroes and monsters.

use crate::formulas::round_half_up;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and level of a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    name: String,
    level: u32,
}

impl Entity {
    /// Levels below 1 are raised to 1.
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level: level.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn advance_level(&mut self) -> u32 {
        self.level += 1;
        self.level
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Lv {})", self.name, self.level)
    }
}

/// A current value tracked against a base (HP or MP).
///
/// The current value never drops below zero. It may exceed the base (potions
/// do that), but regeneration only climbs back up to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    current: i32,
    base: i32,
}

impl Pool {
    pub fn new(base: i32) -> Self {
        let base = base.max(0);
        Self { current: base, base }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Subtract `amount`, clamping at zero. Non-positive amounts are ignored.
    pub fn drain(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current = self.current.saturating_sub(amount).max(0);
    }

    /// Add `amount` with no upper clamp.
    pub fn add(&mut self, amount: i32) {
        self.current = self.current.saturating_add(amount).max(0);
    }

    /// Spend `amount` if available. Returns false without mutation otherwise.
    pub fn try_spend(&mut self, amount: i32) -> bool {
        let amount = amount.max(0);
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Grow the current value by `rate`, capped at the base.
    pub fn regenerate(&mut self, rate: f64) {
        let grown = round_half_up(f64::from(self.current) * rate);
        self.current = grown.min(self.base);
    }

    /// Grow the base by `rate` and refill.
    pub fn grow_base(&mut self, rate: f64) {
        self.base = round_half_up(f64::from(self.base) * rate);
        self.current = self.base;
    }

    pub fn refill(&mut self) {
        self.current = self.base;
    }

    /// Set the current value to half the base (rounded down).
    pub fn refill_half(&mut self) {
        self.current = self.base / 2;
    }
}
