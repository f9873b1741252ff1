//! Actions: named, costed sequences of behaviours.
//!
//! An [`Action`] is created once at content-definition time and shared by
//! reference (`Arc<Action>`) between every character that knows it. Ids come
//! from an explicit [`ActionIdAllocator`] so repeated content loads are
//! reproducible.
//!
//! # Turn resolution
//!
//! ```text
//! charging? ── yes ── countdown > 0 ──────────────► Charging
//!    │                countdown done, recovery ───► Recovered (cursor advances)
//!    │                countdown done, wind-up ────► release ─┐
//!    no                                                       │
//!    ├─ wind-up action ── affordable ─► start charging        │
//!    └─ otherwise ────────────────────────────────► release ◄─┘
//!
//! release: affordable? ── no ──► regen energy, InsufficientEnergy
//!            yes ─► BeforeAction → spend → behaviours → AfterAction
//!                   └─ recovery action ─► start charging, cursor stays
//!                   └─ otherwise ───────► Executed (cursor advances)
//! ```

mod outcome;

pub use outcome::{ActionOutcome, ActionResolution};

use std::fmt;

use crate::character::Character;
use crate::effect::{Behaviour, EffectContext};
use crate::log::LogKind;
use crate::trigger::{TriggerContext, TriggerKind};

// ============================================================================
// Action Ids
// ============================================================================

/// Unique action identifier, assigned once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing [`ActionId`]s.
#[derive(Clone, Debug, Default)]
pub struct ActionIdAllocator {
    next: u32,
}

impl ActionIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after ids already in use.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> ActionId {
        let id = ActionId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far (when started at 0).
    pub fn peek(&self) -> u32 {
        self.next
    }
}

// ============================================================================
// Action
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    id: ActionId,
    name: String,
    energy_cost: u32,
    behaviours: Vec<Behaviour>,
    charge_turns: u32,
    is_precharge: bool,
    description: Option<String>,
}

impl Action {
    pub fn new(
        ids: &mut ActionIdAllocator,
        name: impl Into<String>,
        energy_cost: u32,
        behaviours: Vec<Behaviour>,
    ) -> Self {
        Self {
            id: ids.allocate(),
            name: name.into(),
            energy_cost,
            behaviours,
            charge_turns: 0,
            is_precharge: false,
            description: None,
        }
    }

    /// Make this a charged action.
    ///
    /// With `is_precharge` the actor winds up for `turns` turns before the
    /// behaviours fire. Without it the behaviours fire at once and the actor
    /// recovers for `turns` turns afterwards.
    pub fn with_charge(mut self, turns: u32, is_precharge: bool) -> Self {
        self.charge_turns = turns;
        self.is_precharge = is_precharge;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn energy_cost(&self) -> u32 {
        self.energy_cost
    }

    pub fn behaviours(&self) -> &[Behaviour] {
        &self.behaviours
    }

    pub fn charge_turns(&self) -> u32 {
        self.charge_turns
    }

    pub fn is_precharge(&self) -> bool {
        self.is_precharge
    }

    /// Custom description, or one assembled from the behaviours.
    pub fn description(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let mut parts: Vec<String> = self.behaviours.iter().map(Behaviour::description).collect();
        if self.charge_turns > 0 {
            let phase = if self.is_precharge {
                "Charges"
            } else {
                "Recovers"
            };
            parts.push(format!("{phase} for {} turns", self.charge_turns));
        }
        if parts.is_empty() {
            return "Does nothing".to_string();
        }
        parts.join(". ")
    }

    fn winds_up(&self) -> bool {
        self.is_precharge && self.charge_turns > 0
    }

    fn recovers(&self) -> bool {
        !self.is_precharge && self.charge_turns > 0
    }

    /// Resolve one turn of this action for `actor` against `target`.
    pub fn execute(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> ActionOutcome {
        if actor.is_charging() {
            let remaining = actor.charge_turns().saturating_sub(1);
            if remaining > 0 {
                ctx.battle_log(actor.name(), LogKind::Charge, Some(remaining as i32), self.name());
                return ActionOutcome {
                    actor: actor.with_charge(true, remaining),
                    target,
                    resolution: ActionResolution::Charging { remaining },
                };
            }

            let actor = actor.with_charge(false, 0);
            if !self.is_precharge {
                ctx.message_log(LogKind::Charge, &format!("{} is ready again", actor.name()));
                return ActionOutcome {
                    actor: actor.advance_action_cursor(),
                    target,
                    resolution: ActionResolution::Recovered,
                };
            }
            return self.release(actor, target, ctx);
        }

        if self.winds_up() {
            if !self.is_affordable_by(&actor) {
                return self.rest(actor, target, ctx);
            }
            ctx.battle_log(
                actor.name(),
                LogKind::Charge,
                Some(self.charge_turns as i32),
                self.name(),
            );
            return ActionOutcome {
                actor: actor.with_charge(true, self.charge_turns),
                target,
                resolution: ActionResolution::Charging {
                    remaining: self.charge_turns,
                },
            };
        }

        self.release(actor, target, ctx)
    }

    /// Spend energy and run the behaviours.
    fn release(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> ActionOutcome {
        if !self.is_affordable_by(&actor) {
            return self.rest(actor, target, ctx);
        }

        ctx.message_log(LogKind::Action, &format!("{} uses {}", actor.name(), self.name));

        let mut cost = TriggerContext::new(self.energy_cost as i64);
        let (actor, target) =
            actor.fire_triggers(TriggerKind::BeforeAction, target, &mut cost, ctx);
        let spent = cost.value_u32();
        let actor = actor.spend_energy(spent);

        let (actor, target) = self
            .behaviours
            .iter()
            .fold((actor, target), |(actor, target), behaviour| {
                behaviour.execute(actor, target, ctx)
            });

        let mut after = TriggerContext::new(spent as i64);
        let (actor, target) =
            actor.fire_triggers(TriggerKind::AfterAction, target, &mut after, ctx);

        let actor = if self.recovers() {
            ctx.battle_log(
                actor.name(),
                LogKind::Charge,
                Some(self.charge_turns as i32),
                self.name(),
            );
            actor.with_charge(true, self.charge_turns)
        } else {
            actor.advance_action_cursor()
        };

        ActionOutcome {
            actor,
            target,
            resolution: ActionResolution::Executed,
        }
    }

    pub fn is_affordable_by(&self, actor: &Character) -> bool {
        actor.stats().can_afford(self.energy_cost)
    }

    /// Recover `energy_regen` energy instead of acting.
    fn rest(
        &self,
        actor: Character,
        target: Character,
        ctx: &mut EffectContext<'_>,
    ) -> ActionOutcome {
        let available = actor.stats().energy;
        let regen = actor.stats().energy_regen.max(0) as u32;
        let actor = actor.recover_energy(regen);
        ctx.battle_log(
            actor.name(),
            LogKind::Energy,
            Some((actor.stats().energy - available) as i32),
            actor.name(),
        );
        ActionOutcome {
            actor,
            target,
            resolution: ActionResolution::InsufficientEnergy {
                needed: self.energy_cost,
                available,
            },
        }
    }
}
