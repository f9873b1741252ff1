//! Enemy roster loader.

use std::path::Path;

use arena_core::{ActionTrigger, Character, Item, StatBlock};
use serde::{Deserialize, Serialize};

use crate::loaders::{ActionRegistry, LoadResult, read_file};

/// An enemy as written in the roster. Actions are referenced by catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    #[serde(default)]
    pub sprite: Option<String>,
    pub round: u32,
    pub stats: StatBlock,
    pub actions: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<ActionTrigger>,
    #[serde(default)]
    pub equipment: Vec<Item>,
}

impl EnemySpec {
    /// Build the enemy, resolving its action names against `registry`.
    pub fn build(&self, registry: &ActionRegistry) -> LoadResult<Character> {
        let actions = registry
            .resolve(&self.actions)
            .map_err(|e| anyhow::anyhow!("Enemy '{}': {}", self.name, e))?;

        let mut builder = Character::builder()
            .name(self.name.clone())
            .stats(self.stats.clone())
            .actions(actions);
        if let Some(sprite) = &self.sprite {
            builder = builder.sprite(sprite.clone());
        }
        for trigger in &self.triggers {
            builder = builder.trigger(trigger.clone());
        }
        for item in &self.equipment {
            builder = builder.equip(item.clone());
        }

        Ok(builder.build()?)
    }
}

/// Roster file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub enemies: Vec<EnemySpec>,
}

/// All known enemies, in file order.
#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    enemies: Vec<EnemySpec>,
}

impl EnemyRoster {
    pub fn load_embedded() -> LoadResult<Self> {
        Self::from_ron_str(include_str!("../../data/enemies.ron"))
    }

    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> LoadResult<Self> {
        let file: RosterFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy roster RON: {}", e))?;

        tracing::debug!(
            target: "arena::content",
            count = file.enemies.len(),
            "loaded enemy roster"
        );
        Ok(Self {
            enemies: file.enemies,
        })
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&EnemySpec> {
        self.enemies
            .iter()
            .find(|enemy| enemy.name.eq_ignore_ascii_case(name))
    }

    /// The first enemy assigned to `round`, falling back to the strongest
    /// enemy of an earlier round once the roster runs out.
    pub fn for_round(&self, round: u32) -> Option<&EnemySpec> {
        self.enemies
            .iter()
            .find(|enemy| enemy.round == round)
            .or_else(|| {
                self.enemies
                    .iter()
                    .filter(|enemy| enemy.round < round)
                    .max_by_key(|enemy| enemy.round)
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemySpec> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
