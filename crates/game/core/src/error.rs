//! Error types surfaced by the combat core.
//!
//! Stat arithmetic never fails: out-of-range values are clamped. Errors are
//! reserved for construction preconditions and state machine misuse.

use crate::battle::BattleState;

/// Precondition violations raised while constructing a [`crate::Character`].
///
/// These are fatal for the construction call; the caller must supply the
/// missing field and try again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    #[error("character name is required")]
    NameRequired,

    #[error("character stats are required")]
    StatsRequired,

    #[error("character actions are required")]
    ActionsRequired,
}

/// Errors surfaced by the battle state machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("battle must be {expected} but is {actual}")]
    InvalidState {
        expected: BattleState,
        actual: BattleState,
    },

    #[error("battle cannot start: {}", .0.join("; "))]
    CannotStart(Vec<String>),

    #[error("{name} has no action at index {index}")]
    NoCurrentAction { name: String, index: usize },
}
