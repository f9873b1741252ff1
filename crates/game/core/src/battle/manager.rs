//! The battle step machine.

use std::fmt;
use std::sync::Arc;

use super::{BattleOutcome, BattleState, Side, TickOutcome};
use crate::action::ActionResolution;
use crate::character::Character;
use crate::config::BattleConfig;
use crate::effect::EffectContext;
use crate::error::BattleError;
use crate::log::{BattleLog, LogKind, LogSink};
use crate::rng::{PcgRng, RngOracle};

/// Sequences turns between a player and an AI combatant.
///
/// ```text
/// NotStarted ──start_battle──► InProgress ──(defeat | timeout | end_battle | cleanup)──► Ended
///                                 ▲   │
///                        resume ──┘   └── pause
/// ```
///
/// Each tick fills both action counters by speed. A counter reaching the
/// threshold grants a turn; when both are ready on the same tick the higher
/// raw counter acts first and ties go to the player.
pub struct BattleManager {
    player: Character,
    ai: Character,
    round: u32,
    config: BattleConfig,
    state: BattleState,
    paused: bool,
    turn_count: u32,
    log: BattleLog,
    rng: Arc<dyn RngOracle>,
    seed: u64,
    nonce: u64,
    outcome: Option<BattleOutcome>,
    last_actor: Option<Side>,
}

impl BattleManager {
    pub fn new(player: Character, ai: Character, round: u32) -> Self {
        Self {
            player,
            ai,
            round: round.max(1),
            config: BattleConfig::default(),
            state: BattleState::NotStarted,
            paused: false,
            turn_count: 0,
            log: BattleLog::new(),
            rng: Arc::new(PcgRng),
            seed: 0,
            nonce: 0,
            outcome: None,
            last_actor: None,
        }
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed for trigger chance rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    // ===== queries =====

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.state == BattleState::InProgress && !self.paused
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn ai(&self) -> &Character {
        &self.ai
    }

    pub fn character(&self, side: Side) -> &Character {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn battle_log(&self) -> &BattleLog {
        &self.log
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// The side that acted most recently.
    pub fn last_actor(&self) -> Option<Side> {
        self.last_actor
    }

    pub fn is_player_victorious(&self) -> bool {
        self.outcome == Some(BattleOutcome::Winner(Side::Player))
    }

    /// The winning character, if the battle ended with one.
    pub fn winner(&self) -> Option<&Character> {
        self.outcome
            .and_then(BattleOutcome::winner)
            .map(|side| self.character(side))
    }

    /// Reasons the battle cannot start. Empty means it can.
    pub fn can_start_battle(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        for character in [&self.player, &self.ai] {
            if !character.is_alive() {
                reasons.push(format!("{} has no health left", character.name()));
            }
        }
        let required = self.config.required_actions(self.round);
        let chosen = self.player.chosen_actions().len();
        if chosen != required {
            reasons.push(format!(
                "{} must choose exactly {required} actions for round {} (has {chosen})",
                self.player.name(),
                self.round
            ));
        }
        reasons
    }

    // ===== lifecycle =====

    pub fn start_battle(&mut self) -> Result<(), BattleError> {
        self.expect_state(BattleState::NotStarted)?;
        let reasons = self.can_start_battle();
        if !reasons.is_empty() {
            return Err(BattleError::CannotStart(reasons));
        }

        self.turn_count = 0;
        self.nonce = 0;
        self.log.clear();
        self.player = self.player.apply_out_of_battle_stats();
        self.ai = self.ai.apply_out_of_battle_stats();
        self.state = BattleState::InProgress;
        self.paused = false;
        self.outcome = None;
        self.last_actor = None;

        let message = format!(
            "Round {}: {} vs {}",
            self.round,
            self.player.name(),
            self.ai.name()
        );
        self.log.message_log(LogKind::Info, &message);
        Ok(())
    }

    pub fn pause_battle(&mut self) -> Result<(), BattleError> {
        self.expect_state(BattleState::InProgress)?;
        self.paused = true;
        Ok(())
    }

    pub fn resume_battle(&mut self) -> Result<(), BattleError> {
        self.expect_state(BattleState::InProgress)?;
        self.paused = false;
        Ok(())
    }

    /// Flip the pause flag. Returns whether the battle is now paused.
    pub fn toggle_pause(&mut self) -> Result<bool, BattleError> {
        self.expect_state(BattleState::InProgress)?;
        self.paused = !self.paused;
        Ok(self.paused)
    }

    /// Force the battle into `Ended` without deciding a winner.
    pub fn cleanup(&mut self) {
        self.state = BattleState::Ended;
        self.paused = false;
    }

    fn expect_state(&self, expected: BattleState) -> Result<(), BattleError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(BattleError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    // ===== stepping =====

    /// Advance the battle by one tick.
    pub fn advance_tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        if self.should_end() {
            return TickOutcome::Ended(self.conclude());
        }

        let threshold = self.config.action_threshold;
        let (player, player_raw) = self.player.advance_action_counter(threshold);
        let (ai, ai_raw) = self.ai.advance_action_counter(threshold);
        self.player = player;
        self.ai = ai;

        let order = match (player_raw >= threshold, ai_raw >= threshold) {
            (true, true) if ai_raw > player_raw => vec![Side::Ai, Side::Player],
            (true, true) => vec![Side::Player, Side::Ai],
            (true, false) => vec![Side::Player],
            (false, true) => vec![Side::Ai],
            (false, false) => Vec::new(),
        };

        let mut turns = Vec::with_capacity(order.len());
        for side in order {
            self.resolve_turn(side);
            turns.push(side);
            if self.state == BattleState::Ended {
                return match self.outcome {
                    Some(outcome) => TickOutcome::Ended(outcome),
                    None => TickOutcome::Idle,
                };
            }
        }
        TickOutcome::Advanced { turns }
    }

    /// Resolve one turn for `side`.
    ///
    /// A failure inside the turn is narrated as an error entry and ends the
    /// battle; the state machine is never left mid-turn.
    fn resolve_turn(&mut self, side: Side) -> Option<ActionResolution> {
        if !self.is_running() {
            return None;
        }
        match self.try_resolve_turn(side) {
            Ok(resolution) => resolution,
            Err(error) => {
                self.log.message_log(LogKind::Error, &error.to_string());
                self.conclude();
                None
            }
        }
    }

    fn try_resolve_turn(&mut self, side: Side) -> Result<Option<ActionResolution>, BattleError> {
        self.turn_count += 1;
        self.log.next_turn();
        self.last_actor = Some(side);

        let actor = self.character(side).reset_action_counter();
        let actor = actor.apply_start_of_turn_effects(&mut self.log);
        let target = self.character(side.opponent()).clone();

        if !actor.is_alive() {
            self.store(side, actor, target);
            self.conclude();
            return Ok(None);
        }

        let Some(action) = actor.current_action().cloned() else {
            let error = BattleError::NoCurrentAction {
                name: actor.name().to_string(),
                index: actor.current_action_index(),
            };
            self.store(side, actor, target);
            return Err(error);
        };

        let mut ctx = EffectContext::new(self.rng.as_ref(), self.seed, &mut self.log)
            .with_nonce(self.nonce)
            .with_max_depth(self.config.max_trigger_depth);
        let outcome = action.execute(actor, target, &mut ctx);
        self.nonce = ctx.nonce();

        let resolution = outcome.resolution;
        self.store(side, outcome.actor, outcome.target);

        if !self.player.is_alive() || !self.ai.is_alive() {
            self.conclude();
        }
        Ok(Some(resolution))
    }

    fn store(&mut self, side: Side, actor: Character, target: Character) {
        match side {
            Side::Player => {
                self.player = actor;
                self.ai = target;
            }
            Side::Ai => {
                self.ai = actor;
                self.player = target;
            }
        }
    }

    fn should_end(&self) -> bool {
        !self.player.is_alive()
            || !self.ai.is_alive()
            || self.turn_count >= self.config.turn_limit(self.round)
    }

    /// End a running battle now, deciding the outcome on current HP.
    ///
    /// Calling this on an ended battle returns the recorded outcome; a battle
    /// that never started, or was cleaned up undecided, is an error.
    pub fn end_battle(&mut self) -> Result<BattleOutcome, BattleError> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }
        self.expect_state(BattleState::InProgress)?;
        Ok(self.conclude())
    }

    /// The side with more HP wins; equal HP is a draw.
    fn conclude(&mut self) -> BattleOutcome {
        if let Some(outcome) = self.outcome {
            self.state = BattleState::Ended;
            return outcome;
        }

        let player_hp = self.player.stats().hit_points;
        let ai_hp = self.ai.stats().hit_points;
        let outcome = if player_hp > ai_hp {
            BattleOutcome::Winner(Side::Player)
        } else if ai_hp > player_hp {
            BattleOutcome::Winner(Side::Ai)
        } else {
            BattleOutcome::Draw
        };

        let message = match outcome.winner() {
            Some(side) => {
                let loser = self.character(side.opponent());
                if loser.stats().hit_points == 0 {
                    format!("{} has been defeated!", loser.name())
                } else {
                    format!("{} has run away!", loser.name())
                }
            }
            None => "The battle ends in a draw!".to_string(),
        };
        self.log.message_log(LogKind::Victory, &message);

        self.outcome = Some(outcome);
        self.state = BattleState::Ended;
        self.paused = false;
        outcome
    }

    /// Step until the battle ends or `max_ticks` ticks have elapsed.
    ///
    /// Returns `None` if the battle is paused, was never started, or did not
    /// finish within the budget.
    pub fn run_to_end(&mut self, max_ticks: u32) -> Option<BattleOutcome> {
        for _ in 0..max_ticks {
            match self.advance_tick() {
                TickOutcome::Ended(outcome) => return Some(outcome),
                TickOutcome::Idle => return self.outcome,
                TickOutcome::Advanced { .. } => {}
            }
        }
        None
    }
}

impl fmt::Debug for BattleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleManager")
            .field("player", &self.player.name())
            .field("ai", &self.ai.name())
            .field("round", &self.round)
            .field("state", &self.state)
            .field("paused", &self.paused)
            .field("turn_count", &self.turn_count)
            .field("seed", &self.seed)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
