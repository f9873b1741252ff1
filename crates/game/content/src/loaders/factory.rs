//! Content factory for building combatants from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arena_core::{
    Action, ActionIdAllocator, BattleConfig, Character, CharacterClass, Item, StatBlock,
};

use crate::loaders::{
    ActionRegistry, ClassLoader, ConfigLoader, EnemyRoster, ItemLoader, LoadResult,
};

/// What the player brings into a round.
///
/// Empty `actions` picks the first unlocked actions up to the round's
/// requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLoadout {
    pub name: String,
    pub actions: Vec<String>,
    pub class: Option<String>,
    pub items: Vec<String>,
}

impl PlayerLoadout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Content factory that loads all arena content up front.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── actions.ron
/// ├── enemies.ron
/// ├── classes.ron
/// └── items.ron
/// ```
#[derive(Debug, Clone)]
pub struct ContentFactory {
    config: BattleConfig,
    actions: ActionRegistry,
    enemies: EnemyRoster,
    classes: Vec<CharacterClass>,
    items: Vec<Item>,
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Content compiled into the crate.
    pub fn embedded() -> LoadResult<Self> {
        let mut ids = ActionIdAllocator::new();
        Ok(Self {
            config: ConfigLoader::load_embedded()?,
            actions: ActionRegistry::load_embedded(&mut ids)?,
            enemies: EnemyRoster::load_embedded()?,
            classes: ClassLoader::load_embedded()?,
            items: ItemLoader::load_embedded()?,
            data_dir: None,
        })
    }

    /// Load every catalog from `data_dir`.
    pub fn from_dir(data_dir: impl Into<PathBuf>) -> LoadResult<Self> {
        let data_dir = data_dir.into();
        let mut ids = ActionIdAllocator::new();
        let actions = ActionRegistry::load(&data_dir.join("actions.ron"), &mut ids)?;
        let enemies = EnemyRoster::load(&data_dir.join("enemies.ron"))?;
        tracing::info!(
            target: "arena::content",
            dir = %data_dir.display(),
            actions = actions.len(),
            enemies = enemies.len(),
            "loading content directory"
        );

        Ok(Self {
            config: ConfigLoader::load(&data_dir.join("config.toml"))?,
            actions,
            enemies,
            classes: ClassLoader::load(&data_dir.join("classes.ron"))?,
            items: ItemLoader::load(&data_dir.join("items.ron"))?,
            data_dir: Some(data_dir),
        })
    }

    /// Replace the battle configuration, e.g. from a `--config` override.
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn enemies(&self) -> &EnemyRoster {
        &self.enemies
    }

    pub fn classes(&self) -> &[CharacterClass] {
        &self.classes
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// `None` for embedded content.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn class(&self, name: &str) -> LoadResult<CharacterClass> {
        self.classes
            .iter()
            .find(|class| class.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown class '{}'", name))
    }

    pub fn item(&self, name: &str) -> LoadResult<Item> {
        ItemLoader::find(&self.items, name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown item '{}'", name))
    }

    /// Build a named enemy.
    pub fn enemy(&self, name: &str) -> LoadResult<Character> {
        self.enemies
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown enemy '{}'", name))?
            .build(&self.actions)
    }

    /// Build the enemy the roster assigns to `round`.
    pub fn enemy_for_round(&self, round: u32) -> LoadResult<Character> {
        self.enemies
            .for_round(round)
            .ok_or_else(|| anyhow::anyhow!("No enemy available for round {}", round))?
            .build(&self.actions)
    }

    /// Build the player for `round`.
    ///
    /// Available actions are everything unlocked by `round`; chosen actions
    /// must come from that set.
    pub fn player(&self, loadout: &PlayerLoadout, round: u32) -> LoadResult<Character> {
        let available = self.actions.unlocked(round);
        let chosen = if loadout.actions.is_empty() {
            available
                .iter()
                .take(self.config.required_actions(round))
                .cloned()
                .collect()
        } else {
            self.chosen_from(&available, &loadout.actions, round)?
        };

        let mut builder = Character::builder()
            .name(loadout.name.clone())
            .stats(StatBlock::default())
            .actions(available)
            .chosen_actions(chosen);
        if let Some(class) = &loadout.class {
            builder = builder.class(self.class(class)?);
        }
        for item in &loadout.items {
            builder = builder.equip(self.item(item)?);
        }

        let player = builder.build()?;
        tracing::debug!(
            target: "arena::content",
            actor = player.name(),
            round,
            chosen = player.chosen_actions().len(),
            "built player"
        );
        Ok(player)
    }

    fn chosen_from(
        &self,
        available: &[Arc<Action>],
        names: &[String],
        round: u32,
    ) -> LoadResult<Vec<Arc<Action>>> {
        names
            .iter()
            .map(|name| {
                let action = self.actions.require(name)?;
                if !available.iter().any(|a| a.id() == action.id()) {
                    anyhow::bail!("Action '{}' is not unlocked in round {}", name, round);
                }
                Ok(action)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_player_brings_required_actions() {
        let factory = ContentFactory::embedded().unwrap();
        let player = factory.player(&PlayerLoadout::new("Hero"), 1).unwrap();
        assert_eq!(
            player.chosen_actions().len(),
            factory.config().required_actions(1)
        );
    }

    #[test]
    fn locked_actions_are_refused() {
        let factory = ContentFactory::embedded().unwrap();
        let locked = factory
            .actions()
            .iter()
            .find(|action| factory.actions().unlocked(1).iter().all(|a| a.id() != action.id()))
            .map(|action| action.name().to_string())
            .unwrap();

        let loadout = PlayerLoadout {
            actions: vec![locked],
            ..PlayerLoadout::new("Hero")
        };
        assert!(factory.player(&loadout, 1).is_err());
    }

    #[test]
    fn class_and_items_are_applied() {
        let factory = ContentFactory::embedded().unwrap();
        let class = factory.classes()[0].name.clone();
        let item = factory.items()[0].name.clone();
        let loadout = PlayerLoadout {
            class: Some(class.clone()),
            items: vec![item.clone()],
            ..PlayerLoadout::new("Hero")
        };

        let player = factory.player(&loadout, 1).unwrap();
        assert!(player.class(&class).is_some());
        assert_eq!(player.equipment().items().count(), 1);
    }

    #[test]
    fn unknown_names_are_errors() {
        let factory = ContentFactory::embedded().unwrap();
        assert!(factory.enemy("Nobody").is_err());
        assert!(factory.class("Nobody").is_err());
        assert!(factory.item("Nobody").is_err());
    }

    #[test]
    fn every_round_has_an_enemy() {
        let factory = ContentFactory::embedded().unwrap();
        for round in 1..=5 {
            factory.enemy_for_round(round).unwrap();
        }
    }

    #[test]
    fn loads_a_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (file, content) in [
            ("config.toml", include_str!("../../data/config.toml")),
            ("actions.ron", include_str!("../../data/actions.ron")),
            ("enemies.ron", include_str!("../../data/enemies.ron")),
            ("classes.ron", include_str!("../../data/classes.ron")),
            ("items.ron", include_str!("../../data/items.ron")),
        ] {
            std::fs::write(dir.path().join(file), content).unwrap();
        }

        let factory = ContentFactory::from_dir(dir.path()).unwrap();
        assert_eq!(factory.data_dir(), Some(dir.path()));
        assert!(factory.enemy_for_round(1).is_ok());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::from_dir(dir.path().join("absent")).is_err());
    }
}
