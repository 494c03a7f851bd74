//! `bracket analyze` - classify a deck file against the current rules.

use std::path::PathBuf;

use anyhow::Context;
use bracket_core::{Deck, RuleModel, analyze};
use clap::Parser;

use crate::render;

/// Exit code when `--fail-on-unclassified` is set and no bracket fits.
pub const EXIT_UNCLASSIFIED: i32 = 2;

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Deck JSON file (`name`, `commanders`, `cards`, optional `source` and `sourceBracket`)
    #[arg(value_name = "DECK")]
    pub deck: PathBuf,

    /// Output the verdict as JSON for automation
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 when the deck fits no bracket
    #[arg(long)]
    pub fail_on_unclassified: bool,
}

pub fn load_deck(path: &std::path::Path) -> anyhow::Result<Deck> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse deck {}", path.display()))
}

pub fn run_analyze(args: AnalyzeArgs, rules: &RuleModel) -> anyhow::Result<i32> {
    let deck = load_deck(&args.deck)?;
    let verdict = analyze(&deck, rules);

    tracing::info!(
        deck = %deck.name,
        tier = ?verdict.tier,
        reason = %verdict.reason,
        "analyzed deck"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", render::render_verdict(&deck, &verdict));
    }

    if args.fail_on_unclassified && !verdict.is_valid() {
        return Ok(EXIT_UNCLASSIFIED);
    }
    Ok(0)
}
