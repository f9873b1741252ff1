//! Timed additive stat modifiers.

use super::EffectContext;
use crate::character::Character;
use crate::log::LogKind;
use crate::stats::StatKey;
use crate::trigger::{TriggerContext, TriggerKind};

/// Where an active timed effect came from.
///
/// Equipment effects are re-imported on every recompute and never age.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    #[default]
    Action,
    Equipment,
}

/// Add `amount` to `stat` for `duration_turns` turns.
///
/// Applying a buff only stores a copy on the affected character; the stat
/// change shows up at that character's next recompute. Buffs stack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffEffect {
    pub stat: StatKey,
    pub amount: i32,
    pub duration_turns: u32,
    pub is_self_targeted: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: EffectSource,
}

impl BuffEffect {
    pub fn new(stat: StatKey, amount: i32, duration_turns: u32, is_self_targeted: bool) -> Self {
        Self {
            stat,
            amount,
            duration_turns,
            is_self_targeted,
            source: EffectSource::Action,
        }
    }

    /// Passive buff granted by an equipped item.
    pub fn passive(stat: StatKey, amount: i32) -> Self {
        Self {
            stat,
            amount,
            duration_turns: 0,
            is_self_targeted: true,
            source: EffectSource::Equipment,
        }
    }

    pub fn is_passive(&self) -> bool {
        self.source == EffectSource::Equipment
    }

    /// Copy with one less turn remaining.
    pub fn tick(&self) -> Self {
        Self {
            duration_turns: self.duration_turns.saturating_sub(1),
            ..self.clone()
        }
    }

    pub(crate) fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> (Character, Character) {
        let mut applied = TriggerContext::new(self.amount as i64);
        let (actor, target) =
            actor.fire_triggers(TriggerKind::OnApplyBuff, target, &mut applied, ctx);

        let buff = Self {
            amount: applied.value_i32(),
            source: EffectSource::Action,
            ..self.clone()
        };
        let kind = if buff.amount >= 0 {
            LogKind::Buff
        } else {
            LogKind::Debuff
        };

        if self.is_self_targeted {
            ctx.battle_log(actor.name(), kind, Some(buff.amount), actor.name());
            (actor.add_buff(buff), target)
        } else {
            ctx.battle_log(actor.name(), kind, Some(buff.amount), target.name());
            (actor, target.add_buff(buff))
        }
    }

    pub fn description(&self) -> String {
        let who = if self.is_self_targeted { "self" } else { "enemy" };
        format!(
            "{:+} {} for {} turns to {}",
            self.amount,
            self.stat.label(),
            self.duration_turns,
            who
        )
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
    fn self_buff_lands_on_actor_without_changing_stats() {
        let actor = fighter("A", StatBlock::default());
        let target = fighter("B", StatBlock::default());
        let buff = BuffEffect::new(StatKey::Attack, 5, 3, true);

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, target) = buff.execute(actor, target, &mut ctx);

        assert_eq!(actor.active_buffs().len(), 1);
        assert!(target.active_buffs().is_empty());
        assert_eq!(actor.stats().attack, 10);
    }

    #[test]
    fn enemy_debuff_lands_on_target() {
        let actor = fighter("A", StatBlock::default());
        let target = fighter("B", StatBlock::default());
        let debuff = BuffEffect::new(StatKey::Defence, -2, 2, false);

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (actor, target) = debuff.execute(actor, target, &mut ctx);

        assert!(actor.active_buffs().is_empty());
        assert_eq!(target.active_buffs()[0].amount, -2);
        assert_eq!(log.entries()[0].kind, LogKind::Debuff);
    }

    #[test]
    fn tick_produces_new_instance() {
        let buff = BuffEffect::new(StatKey::Speed, 3, 2, true);
        let aged = buff.tick();
        assert_eq!(buff.duration_turns, 2);
        assert_eq!(aged.duration_turns, 1);
    }

    #[test]
    fn description_is_signed() {
        assert_eq!(
            BuffEffect::new(StatKey::Defence, -2, 3, false).description(),
            "-2 defence for 3 turns to enemy"
        );
        assert_eq!(
            BuffEffect::new(StatKey::HpRegen, 4, 1, true).description(),
            "+4 hp regen for 1 turns to self"
        );
    }
}
