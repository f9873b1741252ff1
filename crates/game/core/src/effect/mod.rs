//! Behaviours: the polymorphic units of effect that make up an action.
//!
//! Every behaviour consumes an `(actor, target)` pair and returns the updated
//! pair. Behaviours are plain values; when a timed behaviour (buff, DOT) is
//! applied, a copy is stored on the affected character and aged by the stat
//! pipeline.

mod attack;
mod buff;
mod context;
mod dot;
mod restore;

pub use attack::AttackEffect;
pub use buff::{BuffEffect, EffectSource};
pub use context::EffectContext;
pub use dot::DamageOverTimeEffect;
pub use restore::{HealEffect, RechargeEffect, ShieldEffect};

use crate::character::Character;

/// A single effect carried by an action or a trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behaviour {
    Attack(AttackEffect),
    Buff(BuffEffect),
    DamageOverTime(DamageOverTimeEffect),
    Heal(HealEffect),
    Shield(ShieldEffect),
    Recharge(RechargeEffect),
}

impl Behaviour {
    /// Apply the behaviour, returning the updated `(actor, target)` pair.
    pub fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        match self {
            Behaviour::Attack(effect) => effect.execute(actor, target, ctx),
            Behaviour::Buff(effect) => effect.execute(actor, target, ctx),
            Behaviour::DamageOverTime(effect) => effect.execute(actor, target, ctx),
            Behaviour::Heal(effect) => effect.execute(actor, target, ctx),
            Behaviour::Shield(effect) => effect.execute(actor, target, ctx),
            Behaviour::Recharge(effect) => effect.execute(actor, target, ctx),
        }
    }

    /// Human-readable summary. Deterministic for a given configuration.
    pub fn description(&self) -> String {
        match self {
            Behaviour::Attack(effect) => effect.description(),
            Behaviour::Buff(effect) => effect.description(),
            Behaviour::DamageOverTime(effect) => effect.description(),
            Behaviour::Heal(effect) => effect.description(),
            Behaviour::Shield(effect) => effect.description(),
            Behaviour::Recharge(effect) => effect.description(),
        }
    }
}

impl From<AttackEffect> for Behaviour {
    fn from(effect: AttackEffect) -> Self {
        Behaviour::Attack(effect)
    }
}

impl From<BuffEffect> for Behaviour {
    fn from(effect: BuffEffect) -> Self {
        Behaviour::Buff(effect)
    }
}

impl From<DamageOverTimeEffect> for Behaviour {
    fn from(effect: DamageOverTimeEffect) -> Self {
        Behaviour::DamageOverTime(effect)
    }
}

impl From<HealEffect> for Behaviour {
    fn from(effect: HealEffect) -> Self {
        Behaviour::Heal(effect)
    }
}

impl From<ShieldEffect> for Behaviour {
    fn from(effect: ShieldEffect) -> Self {
        Behaviour::Shield(effect)
    }
}

impl From<RechargeEffect> for Behaviour {
    fn from(effect: RechargeEffect) -> Self {
        Behaviour::Recharge(effect)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::action::{Action, ActionIdAllocator};
    use crate::character::Character;
    use crate::stats::StatBlock;

    /// A character with a single no-op action and the given stats.
    pub fn fighter(name: &str, stats: StatBlock) -> Character {
        let mut ids = ActionIdAllocator::new();
        let idle = Arc::new(Action::new(&mut ids, "Idle", 0, Vec::new()));
        Character::builder()
            .name(name)
            .stats(stats)
            .actions(vec![idle])
            .build()
            .expect("test character is complete")
    }
}
