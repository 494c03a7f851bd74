//! Commander deck bracket classification.
//!
//! Given a deck (commanders plus main deck, as card names) and a rule model
//! (tiers with per-category limits and tier bans, a global ban list, and
//! category card lists), [`analyze`] picks the highest-numbered bracket whose
//! limits and bans the deck satisfies, or reports why it fits none.
//!
//! Rule edits go through [`RuleEdit`] and produce new immutable snapshots;
//! [`RuleStore`] persists them to a JSON file.

#![deny(clippy::print_stdout, clippy::print_stderr)]

mod analyzer;
pub mod card;
pub mod category;
mod deck;
pub mod defaults;
mod error;
mod limit;
pub mod rules;
pub mod store;
mod verdict;

pub use analyzer::{analyze, analyze_document};
pub use card::{CardRef, names_match};
pub use category::{BuiltinCategory, CategoryKey, CategorySet, format_category_name};
pub use deck::Deck;
pub use defaults::default_rule_model;
pub use error::{BracketError, ErrorKind, Result};
pub use limit::Limit;
pub use rules::{RuleDocument, RuleEdit, RuleModel, Tier, TierId, TierUpdate};
pub use store::RuleStore;
pub use verdict::{Verdict, VerdictReason};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
