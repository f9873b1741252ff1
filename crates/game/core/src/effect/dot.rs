//! Damage over time.

use super::EffectContext;
use crate::character::Character;
use crate::log::LogKind;

/// Flat, defence-ignoring damage dealt to the target at each of its turn
/// boundaries for `duration_turns` turns.
///
/// Nothing happens at apply time beyond storing a copy on the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOverTimeEffect {
    pub damage_per_turn: u32,
    pub duration_turns: u32,
}

impl DamageOverTimeEffect {
    pub fn new(damage_per_turn: u32, duration_turns: u32) -> Self {
        Self {
            damage_per_turn,
            duration_turns,
        }
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
        ctx.battle_log(
            actor.name(),
            LogKind::DamageOverTime,
            Some(self.damage_per_turn as i32),
            target.name(),
        );
        (actor, target.add_dot(self.clone()))
    }

    pub fn description(&self) -> String {
        format!(
            "Deals {} damage per turn for {} turns",
            self.damage_per_turn, self.duration_turns
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
    fn applying_stores_without_ticking() {
        let actor = fighter("A", StatBlock::default());
        let target = fighter("B", StatBlock::default());

        let mut log = BattleLog::new();
        let mut ctx = EffectContext::new(&PcgRng, 0, &mut log);
        let (_, target) = DamageOverTimeEffect::new(4, 3).execute(actor, target, &mut ctx);

        assert_eq!(target.active_dots().len(), 1);
        assert_eq!(target.stats().hit_points, 100);
    }

    #[test]
    fn description() {
        assert_eq!(
            DamageOverTimeEffect::new(4, 3).description(),
            "Deals 4 damage per turn for 3 turns"
        );
    }
}
