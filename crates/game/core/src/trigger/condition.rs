//! When a trigger is allowed to fire.

use super::TriggerKind;
use crate::character::Character;
use crate::stats::StatKey;

/// Gate for an [`super::ActionTrigger`].
///
/// The kind must match the event being fired. `chance` is a percentage rolled
/// against a d100; `requirement` is evaluated against the owner and the other
/// combatant. A trigger whose gate fails is skipped without side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCondition {
    pub kind: TriggerKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chance: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirement: Option<Requirement>,
}

impl TriggerCondition {
    pub fn on(kind: TriggerKind) -> Self {
        Self {
            kind,
            chance: None,
            requirement: None,
        }
    }

    pub fn with_chance(mut self, percent: u32) -> Self {
        self.chance = Some(percent);
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

/// Predicate over `(owner, other)`.
///
/// Health thresholds are percentages of max HP.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    ActorHealthBelow(u32),
    ActorHealthAbove(u32),
    TargetHealthBelow(u32),
    ActorShieldAtLeast(u32),
    ActorEnergyAtLeast(u32),
    TargetHasDamageOverTime,
    ActorHasBuff(StatKey),
    All(Vec<Requirement>),
    Any(Vec<Requirement>),
}

impl Requirement {
    pub fn is_met(&self, actor: &Character, target: &Character) -> bool {
        match self {
            Requirement::ActorHealthBelow(percent) => actor.stats().health_percent() < *percent,
            Requirement::ActorHealthAbove(percent) => actor.stats().health_percent() > *percent,
            Requirement::TargetHealthBelow(percent) => target.stats().health_percent() < *percent,
            Requirement::ActorShieldAtLeast(amount) => actor.stats().shield >= *amount,
            Requirement::ActorEnergyAtLeast(amount) => actor.stats().energy >= *amount,
            Requirement::TargetHasDamageOverTime => !target.active_dots().is_empty(),
            Requirement::ActorHasBuff(stat) => actor
                .active_buffs()
                .iter()
                .any(|buff| buff.stat == *stat && buff.amount > 0),
            Requirement::All(all) => all.iter().all(|r| r.is_met(actor, target)),
            Requirement::Any(any) => any.iter().any(|r| r.is_met(actor, target)),
        }
    }
}
