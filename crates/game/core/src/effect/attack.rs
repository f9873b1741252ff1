//! Direct damage.

use super::EffectContext;
use crate::character::Character;
use crate::log::LogKind;
use crate::stats::{StatBlock, StatKey};
use crate::trigger::{TriggerContext, TriggerKind};

/// Deal `damage` plus a percentage of one of the actor's stats.
///
/// ```text
/// scaled = floor(actor[scaling_stat] × scaled_percent / 100)
/// total  = damage + scaled
/// ```
///
/// `OnAttack` triggers on the actor may rewrite `total` before it lands.
/// Afterwards `OnDamageDealt` fires on the actor and `OnDamageTaken` on the
/// target, both with the total as context.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackEffect {
    pub damage: u32,
    pub scaling_stat: StatKey,
    pub scaled_percent: u32,
    pub ignores_defence: bool,
}

impl Default for AttackEffect {
    fn default() -> Self {
        Self {
            damage: 0,
            scaling_stat: StatKey::Attack,
            scaled_percent: 0,
            ignores_defence: false,
        }
    }
}

impl AttackEffect {
    /// Flat attack with no scaling.
    pub fn new(damage: u32) -> Self {
        Self {
            damage,
            ..Self::default()
        }
    }

    pub fn scaling(mut self, stat: StatKey, percent: u32) -> Self {
        self.scaling_stat = stat;
        self.scaled_percent = percent;
        self
    }

    pub fn ignoring_defence(mut self) -> Self {
        self.ignores_defence = true;
        self
    }

    pub fn scaled_damage(&self, stats: &StatBlock) -> u32 {
        let stat = stats.get(self.scaling_stat).max(0) as u64;
        (stat * self.scaled_percent as u64 / 100) as u32
    }

    pub fn total_damage(&self, stats: &StatBlock) -> u32 {
        self.damage.saturating_add(self.scaled_damage(stats))
    }

    pub(crate) fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        let mut attack = TriggerContext::new(self.total_damage(actor.stats()) as i64);
        let (actor, target) = actor.fire_triggers(TriggerKind::OnAttack, target, &mut attack, ctx);
        let total = attack.value_u32();

        let effective = target
            .stats()
            .effective_damage(total, self.ignores_defence);
        let target = target.take_damage(total, self.ignores_defence);
        ctx.battle_log(
            actor.name(),
            LogKind::Damage,
            Some(effective as i32),
            target.name(),
        );

        let mut dealt = TriggerContext::new(total as i64);
        let (actor, target) =
            actor.fire_triggers(TriggerKind::OnDamageDealt, target, &mut dealt, ctx);

        let mut taken = TriggerContext::new(total as i64);
        let (target, actor) =
            target.fire_triggers(TriggerKind::OnDamageTaken, actor, &mut taken, ctx);

        (actor, target)
    }

    pub fn description(&self) -> String {
        let mut text = format!("Deals {} damage", self.damage);
        if self.scaled_percent > 0 {
            text.push_str(&format!(
                " + {}% of {}",
                self.scaled_percent,
                self.scaling_stat.label()
            ));
        }
        if self.ignores_defence {
            text.push_str(" (ignores defence)");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::HealEffect;
    use crate::effect::test_support::fighter;
    use crate::log::BattleLog;
    use crate::rng::PcgRng;
    use crate::trigger::{ActionTrigger, Requirement, TriggerCondition, TriggerEffect};

    #[test]
    fn scaled_attack_against_defence() {
        let attacker = fighter(
            "A",
            StatBlock::default().clone_with(|s| {
                s.attack = 10;
                s.defence = 5;
            }),
        );
        let defender = fighter("B", StatBlock::default().clone_with(|s| s.defence = 3));
        let attack = AttackEffect::new(10).scaling(StatKey::Attack, 100);

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 1, &mut log);
        let (_, defender) = attack.execute(attacker, defender, &mut ctx);

        // scaled = 10, total = 20, effective = max(20 - 3, 1) = 17
        assert_eq!(defender.stats().hit_points, 83);
        assert_eq!(log.entries()[0].value, Some(17));
    }

    #[test]
    fn low_health_heal_trigger_cannot_undo_a_killing_blow() {
        let second_wind = ActionTrigger::new(
            "Second Wind",
            TriggerCondition::on(TriggerKind::OnDamageTaken)
                .with_requirement(Requirement::ActorHealthBelow(30)),
            TriggerEffect::InvokeBehaviour(HealEffect::new(20).into()),
        )
        .once();
        let attacker = fighter("A", StatBlock::default());
        let defender = fighter("B", StatBlock::default()).add_trigger(second_wind);

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 1, &mut log);
        let (_, defender) = AttackEffect::new(500)
            .ignoring_defence()
            .execute(attacker, defender, &mut ctx);

        assert_eq!(defender.stats().hit_points, 0);
        assert!(log.entries().iter().all(|e| e.kind != LogKind::Heal));
    }

    #[test]
    fn scaling_floors_fractional_damage() {
        let stats = StatBlock::default().clone_with(|s| s.defence = 7);
        let attack = AttackEffect::new(0).scaling(StatKey::Defence, 50);
        assert_eq!(attack.scaled_damage(&stats), 3);
    }

    #[test]
    fn negative_stat_scales_to_zero() {
        let stats = StatBlock::default().clone_with(|s| s.attack = -4);
        let attack = AttackEffect::new(2).scaling(StatKey::Attack, 200);
        assert_eq!(attack.total_damage(&stats), 2);
    }

    #[test]
    fn description_mentions_scaling_and_defence() {
        let attack = AttackEffect::new(8)
            .scaling(StatKey::Shield, 25)
            .ignoring_defence();
        assert_eq!(
            attack.description(),
            "Deals 8 damage + 25% of shield (ignores defence)"
        );
        assert_eq!(AttackEffect::new(3).description(), "Deals 3 damage");
    }
}
