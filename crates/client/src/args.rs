//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Simulate a round of arena combat
#[derive(Debug, Clone, Parser)]
#[command(name = "arena")]
#[command(about = "Turn-based arena battle simulator", long_about = None)]
#[command(version)]
pub struct Args {
    /// Player name
    #[arg(long, default_value = "Hero")]
    pub name: String,

    /// Round to play; later rounds unlock more actions and tougher enemies
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub round: u32,

    /// Enemy name from the roster (defaults to the round's enemy)
    #[arg(short, long)]
    pub enemy: Option<String>,

    /// Chosen action, in rotation order (repeat for each slot)
    #[arg(short = 'a', long = "action")]
    pub actions: Vec<String>,

    /// Player class
    #[arg(short, long)]
    pub class: Option<String>,

    /// Item to equip (repeatable)
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// Battle seed (falls back to ARENA_SEED, then a random seed)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Drive the battle on a real timer instead of stepping it headless
    #[arg(long)]
    pub realtime: bool,

    /// Battle configuration TOML overriding the content's config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Content directory (defaults to the embedded content)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Tick budget for headless runs
    #[arg(long, default_value_t = 100_000)]
    pub max_ticks: u32,

    /// Print the content catalog and exit
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["arena"]).unwrap();
        assert_eq!(args.name, "Hero");
        assert_eq!(args.round, 1);
        assert!(args.actions.is_empty());
        assert!(!args.realtime);
    }

    #[test]
    fn repeated_actions_keep_order() {
        let args = Args::try_parse_from([
            "arena", "-r", "2", "-a", "Mend", "-a", "Slash", "--item", "Iron Sword",
        ])
        .unwrap();
        assert_eq!(args.round, 2);
        assert_eq!(args.actions, vec!["Mend", "Slash"]);
        assert_eq!(args.items, vec!["Iron Sword"]);
    }

    #[test]
    fn round_zero_is_rejected() {
        assert!(Args::try_parse_from(["arena", "--round", "0"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
