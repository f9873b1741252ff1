//! What a trigger does once its gate passes.

use super::TriggerContext;
use crate::character::Character;
use crate::effect::{Behaviour, EffectContext};
use crate::log::LogKind;

/// Rewrites the numeric value carried by the event being fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextModifier {
    /// Add a signed amount.
    Add(i64),
    /// Scale to `percent` of the current value (150 = +50%).
    Percent(u32),
    /// Replace the value outright.
    Set(i64),
}

impl ContextModifier {
    pub fn apply(self, value: i64) -> i64 {
        match self {
            ContextModifier::Add(delta) => value.saturating_add(delta),
            ContextModifier::Percent(percent) => value.saturating_mul(percent as i64) / 100,
            ContextModifier::Set(next) => next,
        }
    }
}

/// Interpreted trigger effect. Pure data, so triggers can be loaded from
/// content files and compared in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEffect {
    ModifyContext(ContextModifier),
    /// Run a behaviour with the trigger owner as actor.
    InvokeBehaviour(Behaviour),
    /// Heal the owner for `percent` of the context value (lifesteal).
    ContextHeal { percent: u32 },
    Composite(Vec<TriggerEffect>),
}

impl TriggerEffect {
    pub(crate) fn apply(
        &self,
        owner: Character,
        other: Character,
        context: &mut TriggerContext,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        match self {
            TriggerEffect::ModifyContext(modifier) => {
                context.set(modifier.apply(context.value()));
                (owner, other)
            }
            TriggerEffect::InvokeBehaviour(behaviour) => behaviour.execute(owner, other, ctx),
            TriggerEffect::ContextHeal { percent } => {
                let amount = (context.value().max(0) as u64 * *percent as u64 / 100) as u32;
                if amount == 0 || !owner.is_alive() || owner.stats().is_full_health() {
                    return (owner, other);
                }
                let before = owner.stats().hit_points;
                let owner = owner.restore_health(amount);
                let restored = owner.stats().hit_points - before;
                ctx.battle_log(
                    owner.name(),
                    LogKind::Heal,
                    Some(restored as i32),
                    owner.name(),
                );
                (owner, other)
            }
            TriggerEffect::Composite(effects) => effects
                .iter()
                .fold((owner, other), |(owner, other), effect| {
                    effect.apply(owner, other, context, ctx)
                }),
        }
    }

    pub fn description(&self) -> String {
        match self {
            TriggerEffect::ModifyContext(ContextModifier::Add(delta)) => format!("{delta:+}"),
            TriggerEffect::ModifyContext(ContextModifier::Percent(percent)) => {
                format!("{percent}%")
            }
            TriggerEffect::ModifyContext(ContextModifier::Set(value)) => format!("set to {value}"),
            TriggerEffect::InvokeBehaviour(behaviour) => behaviour.description(),
            TriggerEffect::ContextHeal { percent } => format!("heals for {percent}%"),
            TriggerEffect::Composite(effects) => effects
                .iter()
                .map(TriggerEffect::description)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
