//! Content loaders for reading arena data from files.
//!
//! Every loader parses from a string first (`from_*_str`), with thin wrappers
//! for embedded data and for files on disk.

pub mod actions;
pub mod classes;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod item;

pub use actions::{ActionRegistry, ActionSpec};
pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use enemies::{EnemyRoster, EnemySpec};
pub use factory::{ContentFactory, PlayerLoadout};
pub use item::ItemLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
