//! Data-driven arena content and loaders.
//!
//! This crate houses the static content of the arena and the loaders that turn
//! RON/TOML data files into `arena-core` values:
//! - Action catalog (RON), with ids assigned through an explicit allocator
//! - Enemy roster (RON)
//! - Character classes (RON)
//! - Item catalog (RON)
//! - Battle configuration (TOML)
//!
//! The default catalogs are embedded at compile time; every loader also accepts
//! a path so hosts can ship their own data directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionRegistry, ActionSpec, ClassLoader, ConfigLoader, ContentFactory, EnemyRoster,
    EnemySpec, ItemLoader, LoadResult, PlayerLoadout,
};
