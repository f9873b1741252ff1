//! Execution context threaded through behaviours and triggers.

use crate::config::BattleConfig;
use crate::log::{LogKind, LogSink};
use crate::rng::{RngOracle, compute_seed};

/// Everything a behaviour needs besides the two combatants.
///
/// Holds the narration sink, the deterministic chance source and the nesting
/// depth of trigger evaluation. The battle manager creates one per turn and
/// reads the roll nonce back afterwards so consecutive turns never reuse a seed.
pub struct EffectContext<'a> {
    rng: &'a dyn RngOracle,
    seed: u64,
    nonce: u64,
    depth: usize,
    max_depth: usize,
    log: &'a mut dyn LogSink,
}

impl<'a> EffectContext<'a> {
    pub fn new(rng: &'a dyn RngOracle, seed: u64, log: &'a mut dyn LogSink) -> Self {
        Self {
            rng,
            seed,
            nonce: 0,
            depth: 0,
            max_depth: BattleConfig::MAX_TRIGGER_DEPTH,
            log,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Roll a d100 and advance the nonce.
    pub fn roll_d100(&mut self) -> u32 {
        let seed = compute_seed(self.seed, self.nonce, 0);
        self.nonce += 1;
        self.rng.roll_d100(seed)
    }

    /// Number of rolls made so far (including the starting nonce).
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one level of trigger nesting. Returns false when the limit is reached.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn battle_log(&mut self, source: &str, kind: LogKind, value: Option<i32>, target: &str) {
        self.log.battle_log(source, kind, value, target);
    }

    pub fn message_log(&mut self, kind: LogKind, message: &str) {
        self.log.message_log(kind, message);
    }
}
