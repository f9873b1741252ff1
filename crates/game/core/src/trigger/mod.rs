//! Conditional reactive effects.
//!
//! A [`TriggerManager`] holds an ordered list of [`ActionTrigger`]s owned by a
//! character. When an event fires, matching triggers run in registration order,
//! each folding the `(owner, other)` pair forward to the next one. Nested
//! firing (a trigger whose behaviour fires further triggers) is bounded by the
//! depth limit carried in [`EffectContext`].

mod condition;
mod effect;

pub use condition::{Requirement, TriggerCondition};
pub use effect::{ContextModifier, TriggerEffect};

use crate::character::Character;
use crate::effect::EffectContext;
use crate::log::LogKind;

/// Events a trigger can react to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerKind {
    /// Before an affordable action runs. Context: energy cost.
    BeforeAction,
    /// Before an attack lands. Context: total damage.
    OnAttack,
    /// After an attack lands, on the attacker. Context: total damage.
    OnDamageDealt,
    /// After an attack lands, on the defender. Context: total damage.
    OnDamageTaken,
    /// Before a buff is stored. Context: buff amount.
    OnApplyBuff,
    /// After a heal. Context: health restored.
    OnHeal,
    /// After an action's behaviours have run. Context: energy spent.
    AfterAction,
}

/// Mutable numeric payload of a fired event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerContext {
    value: i64,
}

impl TriggerContext {
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
    }

    /// Value clamped into `u32` (negative becomes 0).
    pub fn value_u32(&self) -> u32 {
        self.value.clamp(0, u32::MAX as i64) as u32
    }

    pub fn value_i32(&self) -> i32 {
        self.value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// A named trigger registered on a character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTrigger {
    pub name: String,
    pub condition: TriggerCondition,
    pub effect: TriggerEffect,
    /// Fire at most once until reset (level-up or out-of-battle refresh).
    #[cfg_attr(feature = "serde", serde(default))]
    pub once: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub has_been_triggered: bool,
}

impl ActionTrigger {
    pub fn new(
        name: impl Into<String>,
        condition: TriggerCondition,
        effect: TriggerEffect,
    ) -> Self {
        Self {
            name: name.into(),
            condition,
            effect,
            once: false,
            has_been_triggered: false,
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn kind(&self) -> TriggerKind {
        self.condition.kind
    }

    pub fn description(&self) -> String {
        format!("{} ({}): {}", self.name, self.kind(), self.effect.description())
    }
}

/// Ordered trigger registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerManager {
    triggers: Vec<ActionTrigger>,
}

impl TriggerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trigger(&mut self, trigger: ActionTrigger) {
        self.triggers.push(trigger);
    }

    /// Remove every trigger with the given name. Returns how many were removed.
    pub fn remove_trigger(&mut self, name: &str) -> usize {
        let before = self.triggers.len();
        self.triggers.retain(|trigger| trigger.name != name);
        before - self.triggers.len()
    }

    /// Clear the fired flag on every trigger.
    pub fn reset(&mut self) {
        for trigger in &mut self.triggers {
            trigger.has_been_triggered = false;
        }
    }

    pub(crate) fn mark_fired(&mut self, index: usize) {
        if let Some(trigger) = self.triggers.get_mut(index) {
            trigger.has_been_triggered = true;
        }
    }

    pub fn has_fired(&self, index: usize) -> bool {
        self.triggers
            .get(index)
            .is_some_and(|trigger| trigger.has_been_triggered)
    }

    pub fn has_kind(&self, kind: TriggerKind) -> bool {
        self.triggers.iter().any(|trigger| trigger.kind() == kind)
    }

    pub fn triggers(&self) -> &[ActionTrigger] {
        &self.triggers
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Run every trigger of `kind` in registration order.
    ///
    /// `owner` is the character these triggers belong to. Once-triggers are
    /// checked against the owner as it stands when the trigger is reached, so a
    /// trigger that fired earlier in the same chain is not repeated.
    pub fn execute_triggers(
        &self,
        kind: TriggerKind,
        owner: Character,
        other: Character,
        context: &mut TriggerContext,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        if !self.has_kind(kind) || !ctx.enter() {
            return (owner, other);
        }

        let mut pair = (owner, other);
        for (index, trigger) in self.triggers.iter().enumerate() {
            if trigger.kind() != kind {
                continue;
            }
            let (owner, other) = pair;
            if trigger.once && owner.triggers().has_fired(index) {
                pair = (owner, other);
                continue;
            }
            let rolled = match trigger.condition.chance {
                Some(chance) => ctx.roll_d100() <= chance,
                None => true,
            };
            let required = trigger
                .condition
                .requirement
                .as_ref()
                .is_none_or(|requirement| requirement.is_met(&owner, &other));
            if !rolled || !required {
                pair = (owner, other);
                continue;
            }

            ctx.message_log(
                LogKind::Trigger,
                &format!("{}'s {} activates", owner.name(), trigger.name),
            );
            let (owner, other) = trigger.effect.apply(owner, other, context, ctx);
            let owner = if trigger.once {
                owner.mark_trigger_fired(index)
            } else {
                owner
            };
            pair = (owner, other);
        }

        ctx.leave();
        pair
    }
}
