//! Rule management commands.
//!
//! ## Commands
//!
//! - `bracket tiers` / `bracket tier ...` - inspect and edit brackets
//! - `bracket ban|unban|banlist` - global ban list
//! - `bracket category ...` - category card lists
//! - `bracket reset|export|import` - whole-file operations

use std::path::PathBuf;

use bracket_core::category::to_camel_case;
use bracket_core::{
    CardRef, CategoryKey, Limit, RuleEdit, RuleStore, Tier, TierId, TierUpdate,
};
use clap::{Parser, Subcommand};

use crate::render;

#[derive(Debug, Parser)]
pub struct TiersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct TierCli {
    #[command(subcommand)]
    pub command: TierSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TierSubcommand {
    /// Show one bracket
    Show {
        id: TierId,
        #[arg(long)]
        json: bool,
    },

    /// Add a bracket, replacing any bracket with the same id
    Add(TierAddArgs),

    /// Change a bracket's name, description or limits; other fields are kept
    Update(TierUpdateArgs),

    /// Set one category limit (`unlimited` or `-1` for no limit)
    SetLimit {
        id: TierId,
        category: CategoryKey,
        #[arg(allow_hyphen_values = true)]
        limit: Limit,
    },

    /// Remove a bracket
    Remove { id: TierId },

    /// Ban a card in one bracket only
    Ban { id: TierId, card: String },

    /// Lift a bracket-specific ban
    Unban { id: TierId, card: String },
}

impl TierSubcommand {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Show { .. })
    }
}

#[derive(Debug, Parser)]
pub struct TierAddArgs {
    pub id: TierId,

    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Category limit as `category=N` or `category=unlimited`; repeatable
    #[arg(long = "limit", value_name = "CATEGORY=LIMIT", value_parser = parse_limit_pair)]
    pub limits: Vec<(CategoryKey, Limit)>,
}

#[derive(Debug, Parser)]
pub struct TierUpdateArgs {
    pub id: TierId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category limit to set, as for `tier add`; repeatable
    #[arg(long = "limit", value_name = "CATEGORY=LIMIT", value_parser = parse_limit_pair)]
    pub limits: Vec<(CategoryKey, Limit)>,
}

fn parse_limit_pair(s: &str) -> Result<(CategoryKey, Limit), String> {
    let (category, limit) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=LIMIT, got \"{s}\""))?;
    let category = category.parse::<CategoryKey>().map_err(|e| e.to_string())?;
    let limit = limit.parse::<Limit>().map_err(|e| e.to_string())?;
    Ok((category, limit))
}

#[derive(Debug, Parser)]
pub struct CategoryCli {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CategorySubcommand {
    /// List categories and their cards
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create a custom category from a display name ("Fast Mana" -> fastMana)
    Create {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Delete a custom category
    Delete { key: CategoryKey },

    /// Add a card to a category
    Add {
        key: CategoryKey,
        card: String,
        /// External card id (e.g. a Scryfall id)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a card from a category by name or external id
    Remove { key: CategoryKey, card: String },
}

impl CategorySubcommand {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::List { .. })
    }
}

pub fn run_tiers(args: TiersArgs, store: &RuleStore) -> anyhow::Result<i32> {
    let rules = store.snapshot();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rules.to_document().tiers)?
        );
    } else {
        println!("{}", render::render_tiers(&rules));
    }
    Ok(0)
}

pub fn run_tier(cli: TierCli, store: &mut RuleStore) -> anyhow::Result<i32> {
    match cli.command {
        TierSubcommand::Show { id, json } => {
            let rules = store.snapshot();
            let tier = rules
                .tier(id)
                .ok_or(bracket_core::BracketError::TierNotFound { id })?;
            if json {
                println!("{}", serde_json::to_string_pretty(tier)?);
            } else {
                println!("{}", render::render_tier(id, tier));
            }
        }
        TierSubcommand::Add(args) => {
            let mut tier = Tier::new(args.name, args.description);
            for (category, limit) in args.limits {
                tier = tier.with_limit(category, limit);
            }
            let name = tier.name.clone();
            store.apply(RuleEdit::PutTier { id: args.id, tier })?;
            println!("Added Bracket {}: {name}", args.id);
        }
        TierSubcommand::Update(args) => {
            let update = TierUpdate {
                name: args.name,
                description: args.description,
                limits: args.limits.into_iter().collect(),
                banned_cards: None,
            };
            let rules = store.apply(RuleEdit::UpdateTier { id: args.id, update })?;
            let name = rules.tier(args.id).map(|tier| tier.name.as_str()).unwrap_or_default();
            println!("Updated Bracket {}: {name}", args.id);
        }
        TierSubcommand::SetLimit {
            id,
            category,
            limit,
        } => {
            let display = category.display_name();
            store.apply(RuleEdit::SetLimit {
                tier: id,
                category,
                limit,
            })?;
            println!(
                "Bracket {id}: {display} limit set to {}",
                render::format_limit(limit)
            );
        }
        TierSubcommand::Remove { id } => {
            store.apply(RuleEdit::RemoveTier { id })?;
            println!("Removed Bracket {id}");
        }
        TierSubcommand::Ban { id, card } => {
            store.apply(RuleEdit::AddTierBan {
                tier: id,
                card: card.clone(),
            })?;
            println!("Banned {card} in Bracket {id}");
        }
        TierSubcommand::Unban { id, card } => {
            store.apply(RuleEdit::RemoveTierBan {
                tier: id,
                card: card.clone(),
            })?;
            println!("Unbanned {card} in Bracket {id}");
        }
    }
    Ok(0)
}

pub fn run_ban(card: String, store: &mut RuleStore) -> anyhow::Result<i32> {
    store.apply(RuleEdit::AddGlobalBan { card: card.clone() })?;
    println!("Added {card} to the global ban list");
    Ok(0)
}

pub fn run_unban(card: String, store: &mut RuleStore) -> anyhow::Result<i32> {
    store.apply(RuleEdit::RemoveGlobalBan { card: card.clone() })?;
    println!("Removed {card} from the global ban list");
    Ok(0)
}

pub fn run_banlist(json: bool, store: &RuleStore) -> anyhow::Result<i32> {
    let rules = store.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(rules.global_bans())?);
    } else {
        println!("{}", render::render_banlist(rules.global_bans()));
    }
    Ok(0)
}

pub fn run_category(cli: CategoryCli, store: &mut RuleStore) -> anyhow::Result<i32> {
    match cli.command {
        CategorySubcommand::List { json } => {
            let rules = store.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(rules.categories())?);
            } else {
                println!("{}", render::render_categories(rules.categories()));
            }
        }
        CategorySubcommand::Create { name } => {
            let display_name = name.join(" ");
            let key = to_camel_case(&display_name);
            store.apply(RuleEdit::CreateCategory { display_name })?;
            println!("Created category {key}");
        }
        CategorySubcommand::Delete { key } => {
            store.apply(RuleEdit::DeleteCategory { key: key.clone() })?;
            println!("Deleted category {key}");
        }
        CategorySubcommand::Add { key, card, id } => {
            let card = match id {
                Some(id) => CardRef::identified(card, id),
                None => CardRef::name(card),
            };
            let label = card.to_string();
            store.apply(RuleEdit::AddCard {
                category: key.clone(),
                card,
            })?;
            println!("Added {label} to {key}");
        }
        CategorySubcommand::Remove { key, card } => {
            store.apply(RuleEdit::RemoveCard {
                category: key.clone(),
                identifier: card.clone(),
            })?;
            println!("Removed {card} from {key}");
        }
    }
    Ok(0)
}

pub fn run_reset(store: &mut RuleStore) -> anyhow::Result<i32> {
    store.reset_to_defaults()?;
    println!("Rules reset to defaults");
    Ok(0)
}

pub fn run_export(path: PathBuf, store: &RuleStore) -> anyhow::Result<i32> {
    store.export_to(&path)?;
    println!("Exported rules to {}", path.display());
    Ok(0)
}

pub fn run_import(path: PathBuf, store: &mut RuleStore) -> anyhow::Result<i32> {
    let rules = store.import_from(&path)?;
    println!(
        "Imported {} brackets and {} categories from {}",
        rules.tiers().count(),
        rules.categories().len(),
        path.display()
    );
    Ok(0)
}
