/// Battle configuration constants and tunable parameters.
///
/// The associated constants are the canonical defaults exposed to host
/// applications; an instance carries the values a particular battle runs with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Turn cap per round. A battle times out once `turn_count >= max_turns * round`.
    pub max_turns: u32,
    /// Interval between ticks when the battle is driven by a real timer.
    pub turn_interval_ms: u64,
    /// Number of chosen actions required in round 1. Each later round needs one more.
    pub starting_required_actions: usize,
    /// Action-counter value that grants a turn.
    pub action_threshold: u32,
    /// Maximum nesting of trigger effects that invoke further behaviours.
    pub max_trigger_depth: usize,
}

impl BattleConfig {
    // ===== canonical defaults =====
    pub const MAX_TURNS: u32 = 50;
    pub const TURN_INTERVAL_MS: u64 = 100;
    pub const STARTING_REQUIRED_ACTIONS: usize = 3;
    pub const ACTION_THRESHOLD: u32 = 100;
    pub const MAX_TRIGGER_DEPTH: usize = 4;

    pub fn new() -> Self {
        Self {
            max_turns: Self::MAX_TURNS,
            turn_interval_ms: Self::TURN_INTERVAL_MS,
            starting_required_actions: Self::STARTING_REQUIRED_ACTIONS,
            action_threshold: Self::ACTION_THRESHOLD,
            max_trigger_depth: Self::MAX_TRIGGER_DEPTH,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_turn_interval_ms(mut self, turn_interval_ms: u64) -> Self {
        self.turn_interval_ms = turn_interval_ms;
        self
    }

    pub fn with_starting_required_actions(mut self, count: usize) -> Self {
        self.starting_required_actions = count;
        self
    }

    /// Number of chosen actions the player must bring into `round`.
    pub fn required_actions(&self, round: u32) -> usize {
        self.starting_required_actions + round.saturating_sub(1) as usize
    }

    /// Turn count at which a battle in `round` times out.
    pub fn turn_limit(&self, round: u32) -> u32 {
        self.max_turns.saturating_mul(round.max(1))
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_actions_grow_with_round() {
        let config = BattleConfig::default();
        assert_eq!(config.required_actions(1), 3);
        assert_eq!(config.required_actions(3), 5);
    }

    #[test]
    fn turn_limit_scales_with_round() {
        let config = BattleConfig::default().with_max_turns(10);
        assert_eq!(config.turn_limit(1), 10);
        assert_eq!(config.turn_limit(4), 40);
        // Round 0 is treated as round 1
        assert_eq!(config.turn_limit(0), 10);
    }
}
