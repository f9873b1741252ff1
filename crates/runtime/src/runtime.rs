//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle in real time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use arena_core::{BattleConfig, BattleManager};

use crate::api::{BattleHandle, ListenerRegistry, Result, RuntimeError};
use crate::events::EventBus;
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Overrides the battle's own `turn_interval_ms` when set.
    pub turn_interval: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed hosts should give new battles; `None` lets them pick one.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            turn_interval: None,
            event_buffer_size: 256,
            command_buffer_size: 32,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub const TURN_INTERVAL_VAR: &'static str = "ARENA_TURN_INTERVAL_MS";
    pub const EVENT_CAPACITY_VAR: &'static str = "ARENA_EVENT_CAPACITY";
    pub const COMMAND_BUFFER_VAR: &'static str = "ARENA_COMMAND_BUFFER";
    pub const SEED_VAR: &'static str = "ARENA_SEED";

    /// Read overrides from the process environment. Unset variables keep their
    /// defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(ms) = parse_var::<u64>(&lookup, Self::TURN_INTERVAL_VAR)? {
            config.turn_interval = Some(Duration::from_millis(ms.max(1)));
        }
        if let Some(capacity) = parse_var(&lookup, Self::EVENT_CAPACITY_VAR)? {
            config.event_buffer_size = capacity;
        }
        if let Some(buffer) = parse_var(&lookup, Self::COMMAND_BUFFER_VAR)? {
            config.command_buffer_size = buffer;
        }
        config.seed = parse_var(&lookup, Self::SEED_VAR)?;
        Ok(config)
    }

    /// The tick period for a battle running with `battle`.
    pub fn period_for(&self, battle: &BattleConfig) -> Duration {
        self.turn_interval
            .unwrap_or_else(|| Duration::from_millis(battle.turn_interval_ms.max(1)))
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuntimeError::InvalidEnv { name, value }),
    }
}

/// Timer-driven host for a single battle.
///
/// Design: the runtime owns the worker task; [`BattleHandle`] is the cloneable
/// façade clients use to drive it.
pub struct BattleRuntime {
    handle: BattleHandle,
    worker: JoinHandle<()>,
}

impl BattleRuntime {
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Drop this runtime's handle and wait for the worker to exit.
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`].
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    battle: Option<BattleManager>,
    listeners: ListenerRegistry,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle: None,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// The battle the worker will own.
    pub fn battle(mut self, battle: BattleManager) -> Self {
        self.battle = Some(battle);
        self
    }

    /// Register a listener before the worker starts.
    pub fn listener(self, listener: impl Fn() + Send + Sync + 'static) -> Self {
        self.listeners.subscribe(listener);
        self
    }

    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<BattleRuntime> {
        let battle = self.battle.ok_or(RuntimeError::MissingBattle)?;
        let period = self.config.period_for(battle.config());

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus.clone(), self.listeners.clone());

        tracing::debug!(
            target: "arena::runtime",
            period_ms = period.as_millis() as u64,
            round = battle.round(),
            "spawning battle worker"
        );
        let worker = BattleWorker::new(battle, period, command_rx, event_bus, self.listeners);
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(BattleRuntime { handle, worker })
    }
}
