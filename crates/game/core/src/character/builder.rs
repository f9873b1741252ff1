//! Validated character construction.

use std::sync::Arc;

use super::{Character, CharacterClass, Equipment, Item};
use crate::action::Action;
use crate::error::CharacterError;
use crate::stats::StatBlock;
use crate::trigger::{ActionTrigger, TriggerManager};

/// Builder for [`Character`].
///
/// `name`, `stats` and at least one of `actions` / `chosen_actions` are
/// required. When only one action list is given it is used for both.
#[derive(Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    sprite: Option<String>,
    stats: Option<StatBlock>,
    base_stats: Option<StatBlock>,
    actions: Option<Vec<Arc<Action>>>,
    chosen_actions: Option<Vec<Arc<Action>>>,
    equipment: Equipment,
    classes: Vec<CharacterClass>,
    triggers: Vec<ActionTrigger>,
}

impl CharacterBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    /// Current stats. Also used as the base floor unless [`Self::base_stats`] is set.
    pub fn stats(mut self, stats: StatBlock) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn base_stats(mut self, base_stats: StatBlock) -> Self {
        self.base_stats = Some(base_stats);
        self
    }

    /// Every action the character knows.
    pub fn actions(mut self, actions: Vec<Arc<Action>>) -> Self {
        self.actions = Some(actions);
        self
    }

    /// The ordered subset brought into battle.
    pub fn chosen_actions(mut self, actions: Vec<Arc<Action>>) -> Self {
        self.chosen_actions = Some(actions);
        self
    }

    pub fn equip(mut self, item: Item) -> Self {
        self.equipment.equip(item);
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn trigger(mut self, trigger: ActionTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn build(self) -> Result<Character, CharacterError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(CharacterError::NameRequired)?;
        let stats = self.stats.ok_or(CharacterError::StatsRequired)?.normalized();
        let (available_actions, chosen_actions) = match (self.actions, self.chosen_actions) {
            (Some(available), Some(chosen)) => (available, chosen),
            (Some(available), None) => (available.clone(), available),
            (None, Some(chosen)) => (chosen.clone(), chosen),
            (None, None) => return Err(CharacterError::ActionsRequired),
        };

        let mut triggers = TriggerManager::new();
        for trigger in self.triggers {
            triggers.add_trigger(trigger);
        }
        for class in &self.classes {
            for trigger in &class.triggers {
                triggers.add_trigger(trigger.clone());
            }
        }

        let mut character = Character {
            name,
            sprite: self.sprite,
            base_stats: self.base_stats.unwrap_or_else(|| stats.clone()),
            stats,
            equipment: self.equipment,
            classes: self.classes,
            available_actions,
            chosen_actions,
            current_action: 0,
            active_buffs: Vec::new(),
            active_dots: Vec::new(),
            is_charging: false,
            charge_turns: 0,
            triggers,
        };
        character.sync_passive_buffs();
        Ok(character)
    }
}
