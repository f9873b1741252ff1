//! The combatant aggregate.
//!
//! A [`Character`] is an immutable snapshot. Every mutator borrows `self` and
//! returns a new character; the receiver is left exactly as it was. The battle
//! loop replaces both combatants wholesale after each action.

mod builder;
mod class;
mod equipment;

pub use builder::CharacterBuilder;
pub use class::CharacterClass;
pub use equipment::{Equipment, EquipmentSlot, Item};

use std::sync::Arc;

use crate::action::Action;
use crate::effect::{BuffEffect, DamageOverTimeEffect, EffectContext};
use crate::log::{LogKind, LogSink};
use crate::stats::{StatBlock, StatBuilder};
use crate::trigger::{ActionTrigger, TriggerContext, TriggerKind, TriggerManager};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    name: String,
    sprite: Option<String>,
    stats: StatBlock,
    base_stats: StatBlock,
    equipment: Equipment,
    classes: Vec<CharacterClass>,
    available_actions: Vec<Arc<Action>>,
    chosen_actions: Vec<Arc<Action>>,
    current_action: usize,
    active_buffs: Vec<BuffEffect>,
    active_dots: Vec<DamageOverTimeEffect>,
    is_charging: bool,
    charge_turns: u32,
    triggers: TriggerManager,
}

impl Character {
    pub fn builder() -> CharacterBuilder {
        CharacterBuilder::default()
    }

    fn with(&self, update: impl FnOnce(&mut Character)) -> Self {
        let mut next = self.clone();
        update(&mut next);
        next
    }

    // ===== queries =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite(&self) -> Option<&str> {
        self.sprite.as_deref()
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn base_stats(&self) -> &StatBlock {
        &self.base_stats
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn classes(&self) -> &[CharacterClass] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&CharacterClass> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn available_actions(&self) -> &[Arc<Action>] {
        &self.available_actions
    }

    pub fn chosen_actions(&self) -> &[Arc<Action>] {
        &self.chosen_actions
    }

    pub fn current_action_index(&self) -> usize {
        self.current_action
    }

    pub fn current_action(&self) -> Option<&Arc<Action>> {
        self.chosen_actions.get(self.current_action)
    }

    pub fn active_buffs(&self) -> &[BuffEffect] {
        &self.active_buffs
    }

    pub fn active_dots(&self) -> &[DamageOverTimeEffect] {
        &self.active_dots
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn charge_turns(&self) -> u32 {
        self.charge_turns
    }

    pub fn triggers(&self) -> &TriggerManager {
        &self.triggers
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    // ===== stat mutators =====

    pub fn take_damage(&self, amount: u32, ignore_defence: bool) -> Self {
        self.with(|c| c.stats = c.stats.take_damage(amount, ignore_defence))
    }

    pub fn restore_health(&self, amount: u32) -> Self {
        self.with(|c| c.stats = c.stats.restore_health(amount))
    }

    pub fn spend_energy(&self, amount: u32) -> Self {
        self.with(|c| c.stats = c.stats.spend_energy(amount))
    }

    pub fn recover_energy(&self, amount: u32) -> Self {
        self.with(|c| c.stats = c.stats.recover_energy(amount))
    }

    pub fn add_shield(&self, amount: u32) -> Self {
        self.with(|c| c.stats = c.stats.add_shield(amount))
    }

    /// Replace the current stats outright (clamped).
    pub fn with_stats(&self, stats: StatBlock) -> Self {
        self.with(|c| c.stats = stats.normalized())
    }

    /// Fill the action counter. Returns the raw, unclamped counter too.
    pub fn advance_action_counter(&self, threshold: u32) -> (Self, u32) {
        let (stats, raw) = self.stats.advance_action_counter(threshold);
        (self.with(|c| c.stats = stats), raw)
    }

    pub fn reset_action_counter(&self) -> Self {
        self.with(|c| c.stats = c.stats.reset_action_counter())
    }

    // ===== effects =====

    pub fn add_buff(&self, buff: BuffEffect) -> Self {
        self.with(|c| c.active_buffs.push(buff))
    }

    pub fn add_dot(&self, dot: DamageOverTimeEffect) -> Self {
        self.with(|c| c.active_dots.push(dot))
    }

    // ===== equipment and classes =====

    /// Equip `item`, replacing whatever occupied its slot.
    pub fn add_equipment(&self, item: Item) -> Self {
        self.with(|c| {
            c.equipment.equip(item);
            c.sync_passive_buffs();
        })
    }

    pub fn remove_equipment(&self, slot: EquipmentSlot) -> Self {
        self.with(|c| {
            c.equipment.unequip(slot);
            c.sync_passive_buffs();
        })
    }

    /// Re-import equipment passives, dropping those of items no longer worn.
    pub(crate) fn sync_passive_buffs(&mut self) {
        self.active_buffs.retain(|buff| !buff.is_passive());
        let passives: Vec<_> = self
            .equipment
            .items()
            .flat_map(|item| item.passive_buffs())
            .collect();
        self.active_buffs.extend(passives);
    }

    /// Add a class and register its triggers.
    pub fn add_class(&self, class: CharacterClass) -> Self {
        self.with(|c| {
            for trigger in &class.triggers {
                c.triggers.add_trigger(trigger.clone());
            }
            c.classes.push(class);
        })
    }

    /// Raise the named class by one level and re-arm once-triggers.
    ///
    /// Unknown class names leave the character unchanged.
    pub fn level_up_class(&self, name: &str) -> Self {
        if self.class(name).is_none() {
            return self.clone();
        }
        self.with(|c| {
            for class in c.classes.iter_mut().filter(|class| class.name == name) {
                *class = class.level_up();
            }
            c.triggers.reset();
        })
    }

    // ===== actions =====

    /// Replace the battle loadout and rewind the cursor.
    pub fn with_chosen_actions(&self, actions: Vec<Arc<Action>>) -> Self {
        self.with(|c| {
            c.chosen_actions = actions;
            c.current_action = 0;
        })
    }

    /// Move the cursor to the next chosen action, wrapping.
    pub fn advance_action_cursor(&self) -> Self {
        self.with(|c| {
            c.current_action = match c.chosen_actions.len() {
                0 => 0,
                len => (c.current_action + 1) % len,
            };
        })
    }

    pub fn with_charge(&self, is_charging: bool, turns: u32) -> Self {
        self.with(|c| {
            c.is_charging = is_charging;
            c.charge_turns = turns;
        })
    }

    // ===== triggers =====

    pub fn add_trigger(&self, trigger: ActionTrigger) -> Self {
        self.with(|c| c.triggers.add_trigger(trigger))
    }

    pub fn remove_trigger(&self, name: &str) -> Self {
        self.with(|c| {
            c.triggers.remove_trigger(name);
        })
    }

    pub(crate) fn mark_trigger_fired(&self, index: usize) -> Self {
        self.with(|c| c.triggers.mark_fired(index))
    }

    pub fn reset_triggers(&self) -> Self {
        self.with(|c| c.triggers.reset())
    }

    /// Fire this character's triggers of `kind` with `other` as the opposing side.
    ///
    /// Returns `(self, other)` in that order.
    pub fn fire_triggers(
        self,
        kind: TriggerKind,
        other: Character,
        context: &mut TriggerContext,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        if !self.triggers.has_kind(kind) {
            return (self, other);
        }
        let triggers = self.triggers.clone();
        triggers.execute_triggers(kind, self, other, context, ctx)
    }

    // ===== stat pipeline =====

    /// Run the start-of-turn pipeline and write back stats, buffs and DOTs.
    pub fn apply_start_of_turn_effects(&self, log: &mut dyn LogSink) -> Self {
        let built = StatBuilder::start_of_turn(self);
        if built.dot_damage > 0 {
            log.message_log(
                LogKind::DamageOverTime,
                &format!("{} suffers {} damage over time", self.name, built.dot_damage),
            );
        }
        self.with(|c| {
            c.stats = built.stats;
            c.active_buffs = built.buffs;
            c.active_dots = built.dots;
        })
    }

    /// Reset to the class-scaled baseline with full health, ready for a new battle.
    pub fn apply_out_of_battle_stats(&self) -> Self {
        let built = StatBuilder::out_of_battle(self);
        self.with(|c| {
            c.stats = built.stats;
            c.active_buffs = built.buffs;
            c.active_dots = built.dots;
            c.is_charging = false;
            c.charge_turns = 0;
            c.current_action = 0;
            c.triggers.reset();
        })
    }
}
