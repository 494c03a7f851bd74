//! Deck classification.
//!
//! [`analyze`] is a pure function of a deck and a validated rule model. The
//! steps run in a fixed order:
//!
//! 1. Global ban check (short-circuits on any match)
//! 2. Categorization of every deck card against every category
//! 3. Tier search in ascending id order
//! 4. Verdict construction
//!
//! During the tier search the fitting tier is the *highest* id that fit,
//! while the reported violations are those of the *last* tier examined that
//! failed. The two are tracked independently.

use std::collections::BTreeMap;

use crate::card::CardIndex;
use crate::category::{CategoryKey, CategorySet};
use crate::deck::Deck;
use crate::error::{BracketError, Result};
use crate::rules::{RuleDocument, RuleModel, TierId};
use crate::verdict::{Verdict, VerdictReason};

/// Validate raw inputs, then analyze.
///
/// # Errors
///
/// Returns [`BracketError::InvalidInput`] when the deck is absent or the
/// rule document is missing any of its sections. No card is examined in
/// that case.
pub fn analyze_document(deck: Option<&Deck>, rules: &RuleDocument) -> Result<Verdict> {
    let deck = deck.ok_or_else(|| BracketError::invalid_input("a deck is required"))?;
    let rules = RuleModel::from_document(rules.clone())?;
    Ok(analyze(deck, &rules))
}

/// Classify `deck` against `rules`.
pub fn analyze(deck: &Deck, rules: &RuleModel) -> Verdict {
    let all_cards: Vec<&str> = deck.all_cards().collect();

    let banned = find_banned_cards(&all_cards, &CardIndex::from_names(rules.global_bans()));
    if !banned.is_empty() {
        tracing::debug!(
            deck = %deck.name,
            banned = banned.len(),
            "deck contains globally banned cards"
        );
        return Verdict::globally_banned(banned);
    }

    let Categorized {
        counts,
        found_cards,
    } = categorize(&all_cards, rules.categories());

    let TierSearch {
        fitting,
        violations,
    } = find_fitting_tier(&all_cards, &counts, rules);

    match fitting.and_then(|id| rules.tier(id).map(|tier| (id, tier))) {
        Some((id, tier)) => {
            tracing::debug!(deck = %deck.name, tier = id, "deck fits bracket");
            Verdict {
                tier: Some(id),
                tier_name: Some(tier.name.clone()),
                reason: VerdictReason::Fits,
                banned_cards_found: Vec::new(),
                violations: Vec::new(),
                category_counts: counts,
                found_cards,
            }
        }
        None => {
            tracing::debug!(
                deck = %deck.name,
                violations = violations.len(),
                "deck exceeds every bracket"
            );
            Verdict {
                tier: None,
                tier_name: None,
                reason: VerdictReason::ExceedsAllTiers,
                banned_cards_found: Vec::new(),
                violations,
                category_counts: counts,
                found_cards,
            }
        }
    }
}

/// Deck cards (in deck order, duplicates kept) that appear in `bans`.
fn find_banned_cards(cards: &[&str], bans: &CardIndex) -> Vec<String> {
    if bans.is_empty() {
        return Vec::new();
    }
    cards
        .iter()
        .filter(|card| bans.contains_name(card))
        .map(|card| (*card).to_string())
        .collect()
}

struct Categorized {
    counts: BTreeMap<CategoryKey, usize>,
    found_cards: BTreeMap<CategoryKey, Vec<String>>,
}

/// Count deck cards per category. Categories are not mutually exclusive.
fn categorize(cards: &[&str], categories: &CategorySet) -> Categorized {
    let mut counts = BTreeMap::new();
    let mut found_cards = BTreeMap::new();

    for (key, entries) in categories.iter() {
        let index = CardIndex::new(entries);
        let found: Vec<String> = cards
            .iter()
            .filter(|card| index.contains_name(card))
            .map(|card| (*card).to_string())
            .collect();
        counts.insert(key.clone(), found.len());
        found_cards.insert(key.clone(), found);
    }

    Categorized {
        counts,
        found_cards,
    }
}

struct TierSearch {
    /// Highest tier that had no violations.
    fitting: Option<TierId>,
    /// Violations of the most recent failing tier.
    violations: Vec<String>,
}

fn find_fitting_tier(
    cards: &[&str],
    counts: &BTreeMap<CategoryKey, usize>,
    rules: &RuleModel,
) -> TierSearch {
    let mut fitting = None;
    let mut violations = Vec::new();

    for (id, tier) in rules.tiers() {
        let mut current = Vec::new();

        let tier_banned = find_banned_cards(cards, &CardIndex::from_names(&tier.banned_cards));
        if !tier_banned.is_empty() {
            current.push(format!(
                "Banned in bracket {id}: {}",
                tier_banned.join(", ")
            ));
        } else {
            for (category, limit) in &tier.limits {
                let count = counts.get(category).copied().unwrap_or(0);
                if limit.exceeded_by(count) {
                    current.push(format!("{category}: {count} (limit: {limit})"));
                }
            }
        }

        tracing::debug!(
            tier = id,
            violations = current.len(),
            fits = current.is_empty(),
            "examined bracket"
        );

        if current.is_empty() {
            fitting = Some(id);
        } else {
            violations = current;
        }
    }

    TierSearch {
        fitting,
        violations,
    }
}
