//! Action catalog loader.
//!
//! Loads action specs from RON and turns them into shared [`Action`]s, assigning
//! ids in catalog order through the caller's [`ActionIdAllocator`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arena_core::{Action, ActionIdAllocator, Behaviour};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One action as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    #[serde(default)]
    pub energy_cost: u32,
    #[serde(default)]
    pub behaviours: Vec<Behaviour>,
    #[serde(default)]
    pub charge_turns: u32,
    #[serde(default)]
    pub is_precharge: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// First round in which the player may pick this action. `None` keeps it
    /// enemy-only.
    #[serde(default)]
    pub unlock_round: Option<u32>,
}

impl ActionSpec {
    pub fn into_action(self, ids: &mut ActionIdAllocator) -> Action {
        let action = Action::new(ids, self.name, self.energy_cost, self.behaviours)
            .with_charge(self.charge_turns, self.is_precharge);
        match self.description {
            Some(description) => action.with_description(description),
            None => action,
        }
    }
}

/// Action catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCatalog {
    pub actions: Vec<ActionSpec>,
}

/// Registry of loaded actions, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<Action>>,
    unlock_rounds: Vec<Option<u32>>,
    by_name: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Loads the embedded default catalog.
    pub fn load_embedded(ids: &mut ActionIdAllocator) -> LoadResult<Self> {
        Self::from_ron_str(include_str!("../../data/actions.ron"), ids)
    }

    /// Load an action catalog from a RON file.
    pub fn load(path: &Path, ids: &mut ActionIdAllocator) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::from_ron_str(&content, ids)
    }

    pub fn from_ron_str(content: &str, ids: &mut ActionIdAllocator) -> LoadResult<Self> {
        let catalog: ActionCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalog RON: {}", e))?;

        let mut registry = Self::default();
        for spec in catalog.actions {
            if registry.by_name.contains_key(&spec.name) {
                anyhow::bail!("Duplicate action '{}' in catalog", spec.name);
            }
            let unlock_round = spec.unlock_round;
            let action = Arc::new(spec.into_action(ids));
            registry
                .by_name
                .insert(action.name().to_string(), registry.actions.len());
            registry.actions.push(action);
            registry.unlock_rounds.push(unlock_round);
        }

        tracing::debug!(
            target: "arena::content",
            count = registry.len(),
            next_id = ids.peek(),
            "loaded action catalog"
        );
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Action>> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.actions[index]))
    }

    /// Like [`Self::get`], but a missing action is an error.
    pub fn require(&self, name: &str) -> LoadResult<Arc<Action>> {
        self.get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown action '{}'", name))
    }

    /// Resolve a list of names, failing on the first unknown one.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> LoadResult<Vec<Arc<Action>>> {
        names.iter().map(|name| self.require(name.as_ref())).collect()
    }

    /// Actions the player may pick in `round`, in catalog order.
    pub fn unlocked(&self, round: u32) -> Vec<Arc<Action>> {
        self.actions
            .iter()
            .zip(&self.unlock_rounds)
            .filter(|(_, unlock)| unlock.is_some_and(|r| r <= round))
            .map(|(action, _)| Arc::clone(action))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Action>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{AttackEffect, StatKey};

    const CATALOG: &str = r#"(
        actions: [
            (
                name: "Strike",
                energy_cost: 1,
                behaviours: [Attack((damage: 4, scaling_stat: Attack, scaled_percent: 50))],
                unlock_round: Some(1),
            ),
            (
                name: "Meteor",
                energy_cost: 5,
                behaviours: [Attack((damage: 30, ignores_defence: true))],
                charge_turns: 2,
                is_precharge: true,
                unlock_round: Some(3),
            ),
            (name: "Gnaw", behaviours: [Attack((damage: 3))]),
        ],
    )"#;

    #[test]
    fn parses_catalog_and_assigns_ids_in_order() {
        let mut ids = ActionIdAllocator::new();
        let registry = ActionRegistry::from_ron_str(CATALOG, &mut ids).unwrap();

        assert_eq!(registry.len(), 3);
        let strike = registry.get("Strike").unwrap();
        assert_eq!(strike.id().0, 0);
        assert_eq!(
            strike.behaviours()[0],
            AttackEffect::new(4).scaling(StatKey::Attack, 50).into()
        );
        let meteor = registry.get("Meteor").unwrap();
        assert_eq!(meteor.id().0, 1);
        assert!(meteor.is_precharge());
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn unlocks_follow_rounds() {
        let mut ids = ActionIdAllocator::new();
        let registry = ActionRegistry::from_ron_str(CATALOG, &mut ids).unwrap();

        let names = |round| -> Vec<String> {
            registry
                .unlocked(round)
                .iter()
                .map(|a| a.name().to_string())
                .collect()
        };
        assert_eq!(names(1), vec!["Strike"]);
        assert_eq!(names(3), vec!["Strike", "Meteor"]);
    }

    #[test]
    fn second_load_continues_numbering() {
        let mut ids = ActionIdAllocator::new();
        ActionRegistry::from_ron_str(CATALOG, &mut ids).unwrap();
        let again = ActionRegistry::from_ron_str(CATALOG, &mut ids).unwrap();
        assert_eq!(again.get("Strike").unwrap().id().0, 3);
    }

    #[test]
    fn unknown_and_duplicate_names_are_errors() {
        let mut ids = ActionIdAllocator::new();
        let registry = ActionRegistry::from_ron_str(CATALOG, &mut ids).unwrap();
        assert!(registry.require("Nope").is_err());
        assert!(registry.resolve(&["Strike", "Nope"]).is_err());

        let duplicate = r#"(actions: [(name: "A"), (name: "A")])"#;
        assert!(ActionRegistry::from_ron_str(duplicate, &mut ids).is_err());
    }

    #[test]
    fn embedded_catalog_loads() {
        let mut ids = ActionIdAllocator::new();
        let registry = ActionRegistry::load_embedded(&mut ids).unwrap();
        assert!(registry.unlocked(1).len() >= 3);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions.ron");
        std::fs::write(&path, CATALOG).unwrap();

        let mut ids = ActionIdAllocator::new();
        let registry = ActionRegistry::load(&path, &mut ids).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(ActionRegistry::load(&dir.path().join("missing.ron"), &mut ids).is_err());
    }
}
