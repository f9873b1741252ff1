//! Stat system.
//!
//! # Architecture
//!
//! ```text
//! [ Base stats (class/level floor) ]
//!      ↓  StatBuilder: class → equipment → durations → shield → DOTs → buffs → regen
//! [ Effective StatBlock ]
//! ```
//!
//! `StatBlock` is a value object: every operation returns a new block and the
//! receiver is never altered. Invariants (`hit_points <= max_hit_points`,
//! `energy <= max_energy`, `action_counter <= ACTION_THRESHOLD`) are restored
//! by clamping, never by erroring.

pub mod block;
pub mod bonus;
pub mod builder;
pub mod key;

pub use block::StatBlock;
pub use bonus::StatBonus;
pub use builder::{BuiltStats, StatBuilder};
pub use key::StatKey;
