//! One battle session: content, combatants and how to run them.

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;

use arena_content::{ConfigLoader, ContentFactory, PlayerLoadout};
use arena_core::{BattleManager, BattleOutcome, BattleState, LogEntry, LogKind, TickOutcome};
use arena_runtime::{BattleEvent, BattleRuntime, RuntimeConfig};

use crate::args::Args;

/// Everything needed to fight one round.
pub struct Session {
    factory: ContentFactory,
    runtime_config: RuntimeConfig,
    battle: BattleManager,
}

impl Session {
    /// Load content, build both combatants and pick the seed.
    pub fn prepare(args: &Args) -> Result<Self> {
        let mut factory = match &args.data_dir {
            Some(dir) => ContentFactory::from_dir(dir)
                .with_context(|| format!("loading content from {}", dir.display()))?,
            None => ContentFactory::embedded().context("loading embedded content")?,
        };
        if let Some(path) = &args.config {
            factory = factory.with_config(ConfigLoader::load(path)?);
        }

        let runtime_config = RuntimeConfig::from_env()?;
        let seed = args
            .seed
            .or(runtime_config.seed)
            .unwrap_or_else(rand::random::<u64>);

        let loadout = PlayerLoadout {
            name: args.name.clone(),
            actions: args.actions.clone(),
            class: args.class.clone(),
            items: args.items.clone(),
        };
        let player = factory.player(&loadout, args.round)?;
        let enemy = match &args.enemy {
            Some(name) => factory.enemy(name)?,
            None => factory.enemy_for_round(args.round)?,
        };

        tracing::info!(
            round = args.round,
            player = player.name(),
            enemy = enemy.name(),
            seed,
            "prepared battle"
        );
        let battle = BattleManager::new(player, enemy, args.round)
            .with_config(factory.config().clone())
            .with_seed(seed);

        Ok(Self {
            factory,
            runtime_config,
            battle,
        })
    }

    pub fn battle(&self) -> &BattleManager {
        &self.battle
    }

    /// Step the battle to completion without a timer.
    pub fn run_headless(mut self, max_ticks: u32) -> Result<Option<BattleOutcome>> {
        self.start_checked()?;
        self.print_loadouts();

        let mut printed = 0;
        let mut outcome = None;
        for _ in 0..max_ticks {
            let tick = self.battle.advance_tick();
            let log = self.battle.battle_log();
            for entry in log.since(printed) {
                print_entry(entry);
            }
            printed = log.len();

            match tick {
                TickOutcome::Ended(decided) => {
                    outcome = Some(decided);
                    break;
                }
                TickOutcome::Idle => {
                    outcome = self.battle.outcome();
                    break;
                }
                TickOutcome::Advanced { .. } => {}
            }
        }
        if self.battle.state() != BattleState::Ended {
            tracing::warn!(max_ticks, "tick budget exhausted before the battle ended");
        }

        self.print_summary();
        Ok(outcome)
    }

    /// Run on the tokio timer via `arena-runtime`, narrating events as they
    /// arrive. Ctrl-C cleans the battle up.
    pub async fn run_realtime(self) -> Result<Option<BattleOutcome>> {
        let reasons = self.battle.can_start_battle();
        if !reasons.is_empty() {
            anyhow::bail!("battle cannot start: {}", reasons.join("; "));
        }
        self.print_loadouts();

        let runtime = BattleRuntime::builder()
            .config(self.runtime_config.clone())
            .battle(self.battle)
            .build()?;
        let handle = runtime.handle();
        let mut events = handle.subscribe_events();
        handle.start().await?;

        let outcome = loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(BattleEvent::Log(entry)) => print_entry(&entry),
                    Ok(BattleEvent::Ended { outcome, .. }) => break outcome,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event stream lagged");
                    }
                    Err(RecvError::Closed) => break None,
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted, cleaning up battle");
                    handle.cleanup().await?;
                }
            }
        };

        let snapshot = handle.snapshot().await?;
        println!();
        println!(
            "{}: {} HP | {}: {} HP | {} turns",
            snapshot.player.name(),
            snapshot.player.stats().hit_points,
            snapshot.ai.name(),
            snapshot.ai.stats().hit_points,
            snapshot.turn_count
        );

        drop(handle);
        runtime.shutdown().await?;
        Ok(outcome)
    }

    /// List actions, enemies, classes and items.
    pub fn print_catalog(&self) {
        println!("Actions:");
        for action in self.factory.actions().iter() {
            println!("  {:<14} {}", action.name(), action.description());
        }
        println!("Enemies:");
        for enemy in self.factory.enemies().iter() {
            println!("  {:<14} round {}", enemy.name, enemy.round);
        }
        println!("Classes:");
        for class in self.factory.classes() {
            let triggers: Vec<String> = class.triggers.iter().map(|t| t.description()).collect();
            println!("  {:<14} {}", class.name, triggers.join("; "));
        }
        println!("Items:");
        for item in self.factory.items() {
            println!("  {}", item.description());
        }
    }

    fn start_checked(&mut self) -> Result<()> {
        self.battle
            .start_battle()
            .context("battle cannot start")
    }

    fn print_loadouts(&self) {
        for character in [self.battle.player(), self.battle.ai()] {
            let actions: Vec<&str> = character
                .chosen_actions()
                .iter()
                .map(|a| a.name())
                .collect();
            println!("{}: {}", character.name(), actions.join(" → "));
        }
        println!();
    }

    fn print_summary(&self) {
        let player = self.battle.player();
        let ai = self.battle.ai();
        println!();
        println!(
            "{}: {} HP | {}: {} HP | {} turns",
            player.name(),
            player.stats().hit_points,
            ai.name(),
            ai.stats().hit_points,
            self.battle.turn_count()
        );
    }
}

fn print_entry(entry: &LogEntry) {
    match entry.kind {
        LogKind::Info | LogKind::Victory => println!("== {} ==", entry.message),
        LogKind::Error => eprintln!("error: {}", entry.message),
        _ => println!("[{:>3}] {}", entry.turn, entry.message),
    }
}
