//! Battle state machine.
//!
//! [`BattleManager`] is a pure step machine: hosts call
//! [`BattleManager::advance_tick`] from whatever scheduler they have (a tokio
//! interval, a test loop, a headless simulation) and read the results back.

mod manager;

pub use manager::BattleManager;

/// Lifecycle of a battle. `Ended` is terminal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleState {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

/// One of the two combatants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// How a finished battle was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Winner(Side),
    Draw,
}

impl BattleOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            BattleOutcome::Winner(side) => Some(side),
            BattleOutcome::Draw => None,
        }
    }
}

/// Result of a single [`BattleManager::advance_tick`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (paused, not started or already ended).
    Idle,
    /// Counters advanced; `turns` lists who acted, in order.
    Advanced { turns: Vec<Side> },
    Ended(BattleOutcome),
}
