//! `bracket` command-line front end.

use std::path::PathBuf;

use bracket_core::RuleStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod analyze_cmd;
pub mod config;
pub mod render;
pub mod rules_cmd;

pub use config::BracketCliConfig;

use analyze_cmd::AnalyzeArgs;
use rules_cmd::{CategoryCli, TierCli, TiersArgs};

/// Classify Commander decks into power brackets and manage bracket rules
#[derive(Debug, Parser)]
#[command(name = "bracket", version)]
pub struct BracketCli {
    /// Config file (default: $BRACKET_CONFIG or ~/.config/bracket/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Rule file, overriding `rules_path` from the config
    #[arg(long, global = true, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a deck file
    Analyze(AnalyzeArgs),

    /// List all brackets
    Tiers(TiersArgs),

    /// Inspect or edit one bracket
    Tier(TierCli),

    /// Add a card to the global ban list
    Ban { card: String },

    /// Remove a card from the global ban list
    Unban { card: String },

    /// Show the global ban list
    Banlist {
        #[arg(long)]
        json: bool,
    },

    /// Manage categories and their cards
    Category(CategoryCli),

    /// Restore the default rules
    Reset,

    /// Write the current rules to a file
    Export { path: PathBuf },

    /// Replace the current rules with a previously exported file
    Import { path: PathBuf },
}

impl Command {
    /// Commands that only read the rules. These never create, rewrite or
    /// recover the rule file.
    pub fn is_read_only(&self) -> bool {
        match self {
            Self::Analyze(_) | Self::Tiers(_) | Self::Banlist { .. } | Self::Export { .. } => true,
            Self::Tier(cli) => cli.command.is_read_only(),
            Self::Category(cli) => cli.command.is_read_only(),
            Self::Ban { .. }
            | Self::Unban { .. }
            | Self::Reset
            | Self::Import { .. } => false,
        }
    }
}

impl BracketCli {
    /// Dispatch the subcommand. Returns the process exit code.
    pub fn run(self, config: &BracketCliConfig) -> anyhow::Result<i32> {
        let rules_path = self
            .rules
            .unwrap_or_else(|| config.resolved_rules_path());
        let read_only = self.command.is_read_only();
        let mut store = if read_only {
            RuleStore::load(rules_path)?
        } else {
            RuleStore::open(rules_path)?
        };
        tracing::debug!(
            rules = ?store.path().map(|p| p.display().to_string()),
            read_only,
            "rule store ready"
        );

        match self.command {
            Command::Analyze(args) => analyze_cmd::run_analyze(args, &store.snapshot()),
            Command::Tiers(args) => rules_cmd::run_tiers(args, &store),
            Command::Tier(cli) => rules_cmd::run_tier(cli, &mut store),
            Command::Ban { card } => rules_cmd::run_ban(card, &mut store),
            Command::Unban { card } => rules_cmd::run_unban(card, &mut store),
            Command::Banlist { json } => rules_cmd::run_banlist(json, &store),
            Command::Category(cli) => rules_cmd::run_category(cli, &mut store),
            Command::Reset => rules_cmd::run_reset(&mut store),
            Command::Export { path } => rules_cmd::run_export(path, &store),
            Command::Import { path } => rules_cmd::run_import(path, &mut store),
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level;
/// `verbose` forces debug.
pub fn init_logging(config: &BracketCliConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.log_level.trim()))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
