//! Derived-stat recomputation pipeline.
//!
//! The builder always starts from a character's base stats, carrying over only
//! the pools that persist between turns (HP, shield, energy, action counter).
//! Steps are applied in call order and the order changes the numbers, so the
//! battle loop always calls them in the sequence used by
//! [`StatBuilder::start_of_turn`].

use super::block::StatBlock;
use super::bonus::add_signed;
use super::key::StatKey;
use crate::character::Character;
use crate::effect::{BuffEffect, DamageOverTimeEffect};

/// Output of a [`StatBuilder`] run.
///
/// The builder never touches the character; the caller writes these back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltStats {
    pub stats: StatBlock,
    /// Surviving action buffs followed by equipment passives.
    pub buffs: Vec<BuffEffect>,
    pub dots: Vec<DamageOverTimeEffect>,
    /// Total damage dealt by damage-over-time effects during this run.
    pub dot_damage: u32,
}

/// Fluent, order-sensitive stat recomputation.
pub struct StatBuilder<'a> {
    character: &'a Character,
    stats: StatBlock,
    buffs: Vec<BuffEffect>,
    passives: Vec<BuffEffect>,
    dots: Vec<DamageOverTimeEffect>,
    dot_damage: u32,
    aged: bool,
}

impl<'a> StatBuilder<'a> {
    pub fn new(character: &'a Character) -> Self {
        let current = character.stats();
        let mut stats = character.base_stats().clone();
        stats.hit_points = current.hit_points;
        stats.shield = current.shield;
        stats.energy = current.energy;
        stats.action_counter = current.action_counter;

        let buffs = character
            .active_buffs()
            .iter()
            .filter(|buff| !buff.is_passive())
            .cloned()
            .collect();

        Self {
            character,
            stats,
            buffs,
            passives: Vec::new(),
            dots: character.active_dots().to_vec(),
            dot_damage: 0,
            aged: false,
        }
    }

    /// The full start-of-turn pipeline.
    pub fn start_of_turn(character: &'a Character) -> BuiltStats {
        Self::new(character)
            .apply_class_stats()
            .apply_equipment_buffs()
            .decrease_effect_durations()
            .decay_shield()
            .apply_dots()
            .apply_active_buffs()
            .apply_regen()
            .build()
    }

    /// The out-of-battle baseline: class and equipment bonuses, no timed
    /// effects, full health.
    pub fn out_of_battle(character: &'a Character) -> BuiltStats {
        Self::new(character)
            .clear_effects()
            .apply_class_stats()
            .apply_equipment_buffs()
            .refill()
            .apply_active_buffs()
            .build()
    }

    /// Add per-level class bonuses.
    pub fn apply_class_stats(mut self) -> Self {
        for class in self.character.classes() {
            self.stats = class.stat_bonus().apply_to(&self.stats);
        }
        self
    }

    /// Add flat item bonuses and import item passives.
    pub fn apply_equipment_buffs(mut self) -> Self {
        for item in self.character.equipment().items() {
            self.stats = item.bonus().apply_to(&self.stats);
            self.passives.extend(item.passive_buffs());
        }
        self
    }

    /// Age every action buff and DOT by one turn and drop those that reach 0.
    ///
    /// Runs at most once per builder.
    pub fn decrease_effect_durations(mut self) -> Self {
        if self.aged {
            return self;
        }
        self.aged = true;
        self.buffs = self
            .buffs
            .iter()
            .map(BuffEffect::tick)
            .filter(|buff| buff.duration_turns > 0)
            .collect();
        self.dots = self
            .dots
            .iter()
            .map(DamageOverTimeEffect::tick)
            .filter(|dot| dot.duration_turns > 0)
            .collect();
        self
    }

    pub fn decay_shield(mut self) -> Self {
        self.stats = self.stats.decay_shield();
        self
    }

    /// Apply each remaining DOT as defence-ignoring damage.
    pub fn apply_dots(mut self) -> Self {
        for dot in &self.dots {
            let before = self.stats.hit_points + self.stats.shield;
            self.stats = self.stats.take_damage(dot.damage_per_turn, true);
            let after = self.stats.hit_points + self.stats.shield;
            self.dot_damage += before - after;
        }
        self
    }

    /// Sum remaining buffs (action and equipment) onto their stats.
    ///
    /// Buffs naming a non-buffable stat are ignored.
    pub fn apply_active_buffs(mut self) -> Self {
        for buff in self.buffs.iter().chain(self.passives.iter()) {
            let s = &mut self.stats;
            match buff.stat {
                StatKey::Attack => s.attack = s.attack.saturating_add(buff.amount),
                StatKey::Defence => s.defence = s.defence.saturating_add(buff.amount),
                StatKey::Shield => s.shield = add_signed(s.shield, buff.amount),
                StatKey::EnergyRegen => {
                    s.energy_regen = s.energy_regen.saturating_add(buff.amount)
                }
                StatKey::HpRegen => s.hp_regen = s.hp_regen.saturating_add(buff.amount),
                StatKey::Speed => s.speed = s.speed.saturating_add(buff.amount),
                StatKey::HitPoints
                | StatKey::MaxHitPoints
                | StatKey::Energy
                | StatKey::MaxEnergy => {}
            }
        }
        self
    }

    /// HP and energy regen on top of the persisted pools, clamped to max.
    ///
    /// A character at 0 HP does not regenerate health.
    pub fn apply_regen(mut self) -> Self {
        let s = &mut self.stats;
        if s.hit_points > 0 {
            s.hit_points = add_signed(s.hit_points, s.hp_regen).min(s.max_hit_points.max(1));
        }
        s.energy = add_signed(s.energy, s.energy_regen).min(s.max_energy);
        self
    }

    /// Drop every action buff and DOT.
    pub fn clear_effects(mut self) -> Self {
        self.buffs.clear();
        self.dots.clear();
        self
    }

    /// Reset pools to the baseline: full HP, base shield and energy, empty counter.
    pub fn refill(mut self) -> Self {
        let base = self.character.base_stats();
        self.stats.hit_points = self.stats.max_hit_points;
        self.stats.shield = base.shield;
        self.stats.energy = base.energy.min(self.stats.max_energy);
        self.stats.action_counter = 0;
        self
    }

    pub fn build(self) -> BuiltStats {
        let mut buffs = self.buffs;
        buffs.extend(self.passives);
        BuiltStats {
            stats: self.stats.normalized(),
            buffs,
            dots: self.dots,
            dot_damage: self.dot_damage,
        }
    }
}
