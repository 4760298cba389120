//! The seam between the battle engine and whoever drives it.
//!
//! A battle never reads input or prints output itself. It asks a
//! [`BattleController`] for decisions and tells it about every change. The
//! console binary implements this trait over stdin/stdout; tests use
//! [`crate::testing::ScriptedController`].

use crate::action::{EquipmentChoice, MenuChoice};
use crate::events::BattleEvent;
use crate::hero::Hero;
use crate::items::ItemId;
use crate::monster::Monster;
use crate::party::Party;
use serde::{Deserialize, Serialize};

/// What the controller can see when choosing a hero's action.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub hero_index: usize,
    pub hero: &'a Hero,
    pub party: &'a Party,
    pub monsters: &'a [Monster],
    pub round: u32,
}

/// What a bounded selection is choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    Target,
    Spell,
    Potion,
    Weapon,
    Armor,
}

impl ChoiceKind {
    pub fn prompt(&self) -> &'static str {
        match self {
            ChoiceKind::Target => "Choose a target",
            ChoiceKind::Spell => "Choose a spell",
            ChoiceKind::Potion => "Choose a potion",
            ChoiceKind::Weapon => "Choose a weapon",
            ChoiceKind::Armor => "Choose armor",
        }
    }
}

/// One selectable entry. Options are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub detail: String,
    /// The inventory item behind this option, if any.
    pub item: Option<ItemId>,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            item: None,
        }
    }

    pub fn with_item(mut self, id: ItemId) -> Self {
        self.item = Some(id);
        self
    }
}

/// A request to pick a number in `0..=max()`, where 0 cancels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub kind: ChoiceKind,
    pub hero: String,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceRequest {
    pub fn max(&self) -> usize {
        self.options.len()
    }

    /// Map an answer to an option. `None` for cancel or out-of-range.
    pub fn option(&self, answer: usize) -> Option<&ChoiceOption> {
        answer.checked_sub(1).and_then(|i| self.options.get(i))
    }
}

/// Decision-maker for a battle.
pub trait BattleController {
    /// Pick the top-level menu entry for the hero whose turn it is.
    fn choose_action(&mut self, ctx: &TurnContext<'_>) -> MenuChoice;

    /// Pick from the equipment sub-menu.
    fn choose_equipment(&mut self, ctx: &TurnContext<'_>) -> EquipmentChoice;

    /// Answer a bounded selection. Anything above `request.max()` is
    /// reported as invalid and requested again; 0 cancels.
    fn choose(&mut self, request: &ChoiceRequest) -> usize;

    /// Observe a battle event.
    fn notify(&mut self, _event: &BattleEvent) {}
}
