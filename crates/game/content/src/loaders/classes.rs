//! Character class loader.

use std::path::Path;

use arena_core::CharacterClass;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCatalog {
    pub classes: Vec<CharacterClass>,
}

/// Loader for class definitions from RON files.
pub struct ClassLoader;

impl ClassLoader {
    pub fn load_embedded() -> LoadResult<Vec<CharacterClass>> {
        Self::from_ron_str(include_str!("../../data/classes.ron"))
    }

    pub fn load(path: &Path) -> LoadResult<Vec<CharacterClass>> {
        let content = read_file(path)?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> LoadResult<Vec<CharacterClass>> {
        let catalog: ClassCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class catalog RON: {}", e))?;

        if let Some(class) = catalog.classes.iter().find(|class| class.level == 0) {
            anyhow::bail!("Class '{}' must start at level 1 or above", class.name);
        }
        Ok(catalog.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{StatBonus, TriggerKind};

    #[test]
    fn parses_classes_with_triggers() {
        let classes = ClassLoader::from_ron_str(
            r#"(classes: [(
                name: "Berserker",
                per_level: (attack: 2, defence: -1),
                triggers: [(
                    name: "Bloodlust",
                    condition: (kind: OnAttack, requirement: Some(ActorHealthBelow(50))),
                    effect: ModifyContext(Percent(150)),
                )],
            )])"#,
        )
        .unwrap();

        let berserker = &classes[0];
        assert_eq!(berserker.level, 1);
        assert_eq!(
            berserker.stat_bonus(),
            StatBonus::new().with_attack(2).with_defence(-1)
        );
        assert_eq!(berserker.triggers[0].kind(), TriggerKind::OnAttack);
    }

    #[test]
    fn level_zero_is_rejected() {
        let result = ClassLoader::from_ron_str(r#"(classes: [(name: "Nobody", level: 0)])"#);
        assert!(result.is_err());
    }

    #[test]
    fn embedded_classes_load() {
        let classes = ClassLoader::load_embedded().unwrap();
        assert!(classes.len() >= 2);
    }
}
