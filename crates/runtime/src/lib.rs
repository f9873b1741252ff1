//! Real-time host for arena battles.
//!
//! [`arena_core::BattleManager`] is a pure step machine. This crate puts one
//! inside a tokio worker task, ticks it on a fixed interval while it runs, and
//! reports changes through zero-argument listeners and a typed event stream.
//! Consumers build a [`BattleRuntime`] and drive it through [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the broadcast event bus
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    BattleHandle, BattleSnapshot, Listener, ListenerId, ListenerRegistry, Result, RuntimeError,
    Subscription,
};
pub use events::{BattleEvent, EventBus};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, RuntimeConfig};
