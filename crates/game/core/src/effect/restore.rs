//! Self-targeted restoration: heal, shield and recharge.

use super::EffectContext;
use crate::character::Character;
use crate::log::LogKind;
use crate::trigger::{TriggerContext, TriggerKind};

/// Restore health to the actor, clamped to max HP.
///
/// At full health or 0 HP this is a no-op and nothing is narrated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    pub amount: u32,
}

impl HealEffect {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }

    pub(crate) fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        if !actor.is_alive() || actor.stats().is_full_health() {
            return (actor, target);
        }

        let before = actor.stats().hit_points;
        let actor = actor.restore_health(self.amount);
        let restored = actor.stats().hit_points - before;
        ctx.battle_log(
            actor.name(),
            LogKind::Heal,
            Some(restored as i32),
            actor.name(),
        );

        let mut healed = TriggerContext::new(restored as i64);
        actor.fire_triggers(TriggerKind::OnHeal, target, &mut healed, ctx)
    }

    pub fn description(&self) -> String {
        format!("Restores {} health", self.amount)
    }
}

/// Add shield to the actor. Stacks without cap.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldEffect {
    pub amount: u32,
}

impl ShieldEffect {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }

    pub(crate) fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        ctx.battle_log(
            actor.name(),
            LogKind::Shield,
            Some(self.amount as i32),
            actor.name(),
        );
        (actor.add_shield(self.amount), target)
    }

    pub fn description(&self) -> String {
        format!("Grants {} shield", self.amount)
    }
}

/// Restore energy to the actor, clamped to max energy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RechargeEffect {
    pub amount: u32,
}

impl RechargeEffect {
    pub fn new(amount: u32) -> Self {
        Self { amount }
    }

    pub(crate) fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        let before = actor.stats().energy;
        let actor = actor.recover_energy(self.amount);
        ctx.battle_log(
            actor.name(),
            LogKind::Recharge,
            Some((actor.stats().energy - before) as i32),
            actor.name(),
        );
        (actor, target)
    }

    pub fn description(&self) -> String {
        format!("Restores {} energy", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::test_support::fighter;
    use crate::log::BattleLog;
    use crate::rng::PcgRng;
    use crate::stats::StatBlock;

    #[test]
    fn heal_at_full_health_is_silent() {
        let actor = fighter("A", StatBlock::default());
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, _) = HealEffect::new(10).execute(actor, target, &mut ctx);

        assert_eq!(actor.stats().hit_points, 100);
        assert!(log.is_empty());
    }

    #[test]
    fn heal_does_not_revive() {
        let actor = fighter("A", StatBlock::default()).take_damage(500, true);
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, _) = HealEffect::new(20).execute(actor, target, &mut ctx);

        assert!(!actor.is_alive());
        assert!(log.is_empty());
    }

    #[test]
    fn heal_clamps_and_logs_restored_amount() {
        let actor = fighter("A", StatBlock::default().clone_with(|s| s.hit_points = 95));
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, _) = HealEffect::new(10).execute(actor, target, &mut ctx);

        assert_eq!(actor.stats().hit_points, 100);
        assert_eq!(log.entries()[0].value, Some(5));
    }

    #[test]
    fn shield_stacks() {
        let actor = fighter("A", StatBlock::default().clone_with(|s| s.shield = 7));
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, target) = ShieldEffect::new(500).execute(actor, target, &mut ctx);
        let (actor, _) = ShieldEffect::new(500).execute(actor, target, &mut ctx);

        assert_eq!(actor.stats().shield, 1_007);
    }

    #[test]
    fn recharge_clamps_to_max_energy() {
        let actor = fighter("A", StatBlock::default());
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, _) = RechargeEffect::new(50).execute(actor, target, &mut ctx);

        assert_eq!(actor.stats().energy, 10);
        assert_eq!(log.entries()[0].value, Some(9));
    }
}
