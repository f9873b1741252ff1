//! Typed battle events.
//!
//! Every change the worker makes is published on a broadcast bus so that any
//! number of consumers (renderers, loggers, tests) can follow a battle without
//! polling.

mod bus;

pub use bus::{BattleEvent, EventBus};
