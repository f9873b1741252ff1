//! StatBlock - the immutable numeric stat container.

use super::key::StatKey;
use crate::config::BattleConfig;

/// Current numeric state of a combatant.
///
/// Resource pools are unsigned; attack, defence, regen and speed are signed so
/// that enemy-targeted buffs can push them below their floor before clamping.
///
/// # Invariants
///
/// - `hit_points <= max_hit_points`
/// - `energy <= max_energy`
/// - `action_counter <= BattleConfig::ACTION_THRESHOLD`
///
/// All operations take `&self` and return a new block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub attack: i32,
    pub defence: i32,
    pub shield: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub energy_regen: i32,
    pub hp_regen: i32,
    pub speed: i32,
    pub action_counter: u32,
}

impl Default for StatBlock {
    /// 100 HP, 10 attack, 5 defence, 1/10 energy, +1 energy regen, speed 25.
    fn default() -> Self {
        Self {
            hit_points: 100,
            max_hit_points: 100,
            attack: 10,
            defence: 5,
            shield: 0,
            energy: 1,
            max_energy: 10,
            energy_regen: 1,
            hp_regen: 0,
            speed: 25,
            action_counter: 0,
        }
    }
}

impl StatBlock {
    /// Copy of `self` with `overrides` applied, then clamped back into range.
    ///
    /// ```
    /// # use arena_core::StatBlock;
    /// let stats = StatBlock::default().clone_with(|s| s.hit_points = 500);
    /// assert_eq!(stats.hit_points, 100);
    /// ```
    pub fn clone_with(&self, overrides: impl FnOnce(&mut StatBlock)) -> Self {
        let mut next = self.clone();
        overrides(&mut next);
        next.normalized()
    }

    /// Restore the block invariants by clamping.
    pub fn normalized(mut self) -> Self {
        self.max_hit_points = self.max_hit_points.max(1);
        self.hit_points = self.hit_points.min(self.max_hit_points);
        self.energy = self.energy.min(self.max_energy);
        self.action_counter = self.action_counter.min(BattleConfig::ACTION_THRESHOLD);
        self
    }

    /// Damage remaining after defence.
    ///
    /// Defence never fully negates a hit: unless `ignore_defence` is set the
    /// result is at least 1.
    pub fn effective_damage(&self, amount: u32, ignore_defence: bool) -> u32 {
        if ignore_defence {
            return amount;
        }
        let reduced = amount as i64 - self.defence.max(0) as i64;
        reduced.max(1) as u32
    }

    /// Apply a hit. Shield absorbs first, the remainder comes off HP (floored at 0).
    pub fn take_damage(&self, amount: u32, ignore_defence: bool) -> Self {
        let damage = self.effective_damage(amount, ignore_defence);
        let mut next = self.clone();
        if next.shield >= damage {
            next.shield -= damage;
        } else {
            let remainder = damage - next.shield;
            next.shield = 0;
            next.hit_points = next.hit_points.saturating_sub(remainder);
        }
        next
    }

    /// Restore health, clamped to max. A block at 0 HP stays at 0.
    pub fn restore_health(&self, amount: u32) -> Self {
        let mut next = self.clone();
        if next.hit_points == 0 {
            return next;
        }
        next.hit_points = next
            .hit_points
            .saturating_add(amount)
            .min(next.max_hit_points);
        next
    }

    pub fn recover_energy(&self, amount: u32) -> Self {
        let mut next = self.clone();
        next.energy = next.energy.saturating_add(amount).min(next.max_energy);
        next
    }

    /// Spend energy, flooring at 0.
    pub fn spend_energy(&self, amount: u32) -> Self {
        let mut next = self.clone();
        next.energy = next.energy.saturating_sub(amount);
        next
    }

    /// Add shield. Shield stacks without cap.
    pub fn add_shield(&self, amount: u32) -> Self {
        let mut next = self.clone();
        next.shield = next.shield.saturating_add(amount);
        next
    }

    /// Halve the shield (rounding down).
    pub fn decay_shield(&self) -> Self {
        let mut next = self.clone();
        next.shield /= 2;
        next
    }

    /// Fill the action counter by `speed`, clamped at `threshold`.
    ///
    /// Speed counts as at least 1 here, so a slowed combatant still reaches
    /// its next turn and its timed effects keep ageing.
    ///
    /// Returns the new block and the unclamped counter value, which decides
    /// initiative when both combatants become ready on the same tick.
    pub fn advance_action_counter(&self, threshold: u32) -> (Self, u32) {
        let raw = self
            .action_counter
            .saturating_add(self.speed.max(1) as u32);
        let mut next = self.clone();
        next.action_counter = raw.min(threshold).min(BattleConfig::ACTION_THRESHOLD);
        (next, raw)
    }

    pub fn reset_action_counter(&self) -> Self {
        let mut next = self.clone();
        next.action_counter = 0;
        next
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    pub fn is_full_health(&self) -> bool {
        self.hit_points >= self.max_hit_points
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.energy >= cost
    }

    /// Read a stat by key as a signed value.
    pub fn get(&self, key: StatKey) -> i64 {
        match key {
            StatKey::HitPoints => self.hit_points as i64,
            StatKey::MaxHitPoints => self.max_hit_points as i64,
            StatKey::Attack => self.attack as i64,
            StatKey::Defence => self.defence as i64,
            StatKey::Shield => self.shield as i64,
            StatKey::Energy => self.energy as i64,
            StatKey::MaxEnergy => self.max_energy as i64,
            StatKey::EnergyRegen => self.energy_regen as i64,
            StatKey::HpRegen => self.hp_regen as i64,
            StatKey::Speed => self.speed as i64,
        }
    }

    /// HP as a percentage of max HP (0-100).
    pub fn health_percent(&self) -> u32 {
        ((self.hit_points as u64 * 100) / self.max_hit_points.max(1) as u64) as u32
    }
}
