//! Result of resolving one action turn.

use crate::character::Character;

/// How a turn resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResolution {
    /// Energy was spent and the behaviours ran.
    Executed,
    /// The actor spent the turn charging.
    Charging { remaining: u32 },
    /// A recovery countdown finished; the cursor moved on.
    Recovered,
    /// The actor could not pay and rested instead.
    InsufficientEnergy { needed: u32, available: u32 },
}

impl ActionResolution {
    pub fn is_executed(self) -> bool {
        matches!(self, ActionResolution::Executed)
    }
}

/// Updated combatants plus how the turn resolved.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    pub actor: Character,
    pub target: Character,
    pub resolution: ActionResolution,
}

impl ActionOutcome {
    pub fn into_pair(self) -> (Character, Character) {
        (self.actor, self.target)
    }
}
