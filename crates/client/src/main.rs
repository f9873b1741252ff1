//! Arena battle simulator binary.
//!
//! Composition root that assembles content, a battle and (optionally) the
//! real-time runtime, then narrates the battle to stdout. Diagnostics go to
//! stderr through `tracing`.
//!
//! # Examples
//!
//! ```bash
//! # Headless, round 2 against the roster enemy, fixed seed
//! cargo run -p arena-client -- --round 2 --seed 7
//!
//! # Real-time ticking with a custom loadout
//! cargo run -p arena-client -- --realtime -a Slash -a Guard -a "Venom Blade"
//! ```

use anyhow::Result;
use arena_client::{Args, Session};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let session = Session::prepare(&args)?;

    if args.list {
        session.print_catalog();
        return Ok(());
    }

    let outcome = if args.realtime {
        session.run_realtime().await?
    } else {
        session.run_headless(args.max_ticks)?
    };

    tracing::info!(?outcome, "session complete");
    Ok(())
}
