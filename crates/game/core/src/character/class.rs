//! Character classes.

use crate::stats::StatBonus;
use crate::trigger::ActionTrigger;

/// A levelled class granting per-level stat bonuses and triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterClass {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_level: StatBonus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggers: Vec<ActionTrigger>,
}

#[cfg(feature = "serde")]
fn first_level() -> u32 {
    1
}

impl CharacterClass {
    /// A level 1 class.
    pub fn new(name: impl Into<String>, per_level: StatBonus) -> Self {
        Self {
            name: name.into(),
            level: 1,
            per_level,
            triggers: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: ActionTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// `per_level × level`.
    pub fn stat_bonus(&self) -> StatBonus {
        self.per_level.scaled(self.level)
    }

    pub fn level_up(&self) -> Self {
        Self {
            level: self.level.saturating_add(1),
            ..self.clone()
        }
    }
}
