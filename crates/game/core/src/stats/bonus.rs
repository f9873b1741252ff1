//! Flat stat bonuses granted by classes and equipment.
//!
//! Bonuses are additive and applied to the base floor before any timed effect.
//! Negative values are allowed (cursed gear); the affected stat is clamped so
//! pools never drop below their minimum.

use super::block::StatBlock;

/// A flat, additive bonus to the non-resource stats of a [`StatBlock`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBonus {
    pub max_hit_points: i32,
    pub attack: i32,
    pub defence: i32,
    pub max_energy: i32,
    pub energy_regen: i32,
    pub hp_regen: i32,
    pub speed: i32,
}

impl StatBonus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_hit_points(mut self, value: i32) -> Self {
        self.max_hit_points = value;
        self
    }

    pub fn with_attack(mut self, value: i32) -> Self {
        self.attack = value;
        self
    }

    pub fn with_defence(mut self, value: i32) -> Self {
        self.defence = value;
        self
    }

    pub fn with_speed(mut self, value: i32) -> Self {
        self.speed = value;
        self
    }

    pub fn with_energy_regen(mut self, value: i32) -> Self {
        self.energy_regen = value;
        self
    }

    /// Multiply every component by `factor` (used for per-level class bonuses).
    pub fn scaled(&self, factor: u32) -> Self {
        let f = factor as i32;
        Self {
            max_hit_points: self.max_hit_points.saturating_mul(f),
            attack: self.attack.saturating_mul(f),
            defence: self.defence.saturating_mul(f),
            max_energy: self.max_energy.saturating_mul(f),
            energy_regen: self.energy_regen.saturating_mul(f),
            hp_regen: self.hp_regen.saturating_mul(f),
            speed: self.speed.saturating_mul(f),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Add this bonus onto `stats`, returning a new block.
    ///
    /// Current pools are left as they are even if a maximum shrinks; the stat
    /// pipeline normalizes once every layer has been applied.
    pub fn apply_to(&self, stats: &StatBlock) -> StatBlock {
        let mut s = stats.clone();
        s.max_hit_points = add_signed(s.max_hit_points, self.max_hit_points).max(1);
        s.max_energy = add_signed(s.max_energy, self.max_energy);
        s.attack = s.attack.saturating_add(self.attack);
        s.defence = s.defence.saturating_add(self.defence);
        s.energy_regen = s.energy_regen.saturating_add(self.energy_regen);
        s.hp_regen = s.hp_regen.saturating_add(self.hp_regen);
        s.speed = s.speed.saturating_add(self.speed);
        s
    }
}

/// Add a signed delta to an unsigned pool, flooring at 0.
pub(crate) fn add_signed(value: u32, delta: i32) -> u32 {
    if delta >= 0 {
        value.saturating_add(delta as u32)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_multiplies_every_component() {
        let bonus = StatBonus::new().with_attack(2).with_max_hit_points(10);
        let scaled = bonus.scaled(3);
        assert_eq!(scaled.attack, 6);
        assert_eq!(scaled.max_hit_points, 30);
        assert_eq!(scaled.defence, 0);
    }

    #[test]
    fn apply_adds_onto_stats() {
        let stats = StatBonus::new()
            .with_attack(4)
            .with_defence(-2)
            .apply_to(&StatBlock::default());
        assert_eq!(stats.attack, 14);
        assert_eq!(stats.defence, 3);
    }

    #[test]
    fn negative_max_hit_points_clamps_current() {
        let stats = StatBonus::new()
            .with_max_hit_points(-60)
            .apply_to(&StatBlock::default())
            .normalized();
        assert_eq!(stats.max_hit_points, 40);
        assert_eq!(stats.hit_points, 40);
    }

    #[test]
    fn add_signed_floors_at_zero() {
        assert_eq!(add_signed(3, -10), 0);
        assert_eq!(add_signed(3, 4), 7);
    }
}
