//! Deterministic combat rules for a turn-based arena battler.
//!
//! `arena-core` defines the canonical rules (stats, behaviours, triggers,
//! actions, characters and the battle step machine) as pure, clock-free APIs.
//! Runtimes, content loaders and clients depend on the types re-exported here.
//! All battle state changes flow through [`battle::BattleManager`].
pub mod action;
pub mod battle;
pub mod character;
pub mod config;
pub mod effect;
pub mod error;
pub mod log;
pub mod rng;
pub mod stats;
pub mod trigger;

pub use action::{Action, ActionId, ActionIdAllocator, ActionOutcome, ActionResolution};
pub use battle::{BattleManager, BattleOutcome, BattleState, Side, TickOutcome};
pub use character::{Character, CharacterBuilder, CharacterClass, Equipment, EquipmentSlot, Item};
pub use config::BattleConfig;
pub use effect::{
    AttackEffect, Behaviour, BuffEffect, DamageOverTimeEffect, EffectContext, EffectSource,
    HealEffect, RechargeEffect, ShieldEffect,
};
pub use error::{BattleError, CharacterError};
pub use log::{BattleLog, LogEntry, LogKind, LogSink, NullLog};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use stats::{BuiltStats, StatBlock, StatBonus, StatBuilder, StatKey};
pub use trigger::{
    ActionTrigger, ContextModifier, Requirement, TriggerCondition, TriggerContext, TriggerEffect,
    TriggerKind, TriggerManager,
};
