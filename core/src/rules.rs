//! The rule model: tiers, their limits and bans, the global ban list, and the
//! category set.
//!
//! A [`RuleModel`] is only ever built through validation of a
//! [`RuleDocument`] and is immutable afterwards. Changes go through
//! [`RuleModel::apply`], which returns a new snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::{CardRef, names_match};
use crate::category::{CategoryKey, CategorySet, to_camel_case};
use crate::error::{BracketError, Result};
use crate::limit::Limit;

/// Tier identifier. Lower ids are lower power levels.
pub type TierId = u32;

/// A bracket: a named power level with per-category limits and extra bans.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Categories missing here are unlimited for this tier.
    #[serde(default)]
    pub limits: BTreeMap<CategoryKey, Limit>,
    /// Banned in this tier on top of the global list.
    #[serde(default)]
    pub banned_cards: Vec<String>,
}

impl Tier {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, category: impl Into<CategoryKey>, limit: Limit) -> Self {
        self.limits.insert(category.into(), limit);
        self
    }

    pub fn with_ban(mut self, card: impl Into<String>) -> Self {
        self.banned_cards.push(card.into());
        self
    }

    /// The limit for `category`, unlimited when the tier does not name it.
    pub fn limit_for(&self, category: &CategoryKey) -> Limit {
        self.limits
            .get(category)
            .copied()
            .unwrap_or(Limit::Unlimited)
    }
}

/// Wire form of a rule model.
///
/// Every section is optional so that a missing one can be reported as
/// invalid input instead of failing deserialization outright.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    #[serde(default, alias = "brackets", skip_serializing_if = "Option::is_none")]
    pub tiers: Option<BTreeMap<TierId, Tier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_bans: Option<Vec<String>>,
    #[serde(default, alias = "cardCategories", skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategorySet>,
}

impl RuleDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BracketError::invalid_input(format!("malformed rule model: {e}")))
    }
}

/// Validated, immutable rule model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleModel {
    tiers: BTreeMap<TierId, Tier>,
    global_bans: Vec<String>,
    categories: CategorySet,
}

impl RuleModel {
    pub fn new(
        tiers: BTreeMap<TierId, Tier>,
        global_bans: Vec<String>,
        categories: CategorySet,
    ) -> Self {
        Self {
            tiers,
            global_bans,
            categories,
        }
    }

    /// Validate a document into a model.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::InvalidInput`] naming every missing section.
    pub fn from_document(document: RuleDocument) -> Result<Self> {
        let RuleDocument {
            tiers,
            global_bans,
            categories,
        } = document;

        let mut missing = Vec::new();
        if tiers.is_none() {
            missing.push("tiers");
        }
        if global_bans.is_none() {
            missing.push("globalBans");
        }
        if categories.is_none() {
            missing.push("categories");
        }

        match (tiers, global_bans, categories) {
            (Some(tiers), Some(global_bans), Some(categories)) => {
                Ok(Self::new(tiers, global_bans, categories))
            }
            _ => Err(BracketError::invalid_input(format!(
                "rule model is missing required section(s): {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(RuleDocument::from_json(json)?)
    }

    pub fn to_document(&self) -> RuleDocument {
        RuleDocument {
            tiers: Some(self.tiers.clone()),
            global_bans: Some(self.global_bans.clone()),
            categories: Some(self.categories.clone()),
        }
    }

    pub fn tier(&self, id: TierId) -> Option<&Tier> {
        self.tiers.get(&id)
    }

    /// All tiers in ascending id order.
    pub fn tiers(&self) -> impl Iterator<Item = (TierId, &Tier)> {
        self.tiers.iter().map(|(id, tier)| (*id, tier))
    }

    pub fn global_bans(&self) -> &[String] {
        &self.global_bans
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn category(&self, key: &CategoryKey) -> Option<&[CardRef]> {
        self.categories.get(key)
    }

    /// Apply an edit, producing a new snapshot. `self` is left untouched.
    pub fn apply(&self, edit: RuleEdit) -> Result<RuleModel> {
        let mut next = self.clone();
        next.apply_in_place(edit)?;
        Ok(next)
    }

    fn tier_mut(&mut self, id: TierId) -> Result<&mut Tier> {
        self.tiers
            .get_mut(&id)
            .ok_or(BracketError::TierNotFound { id })
    }

    fn category_mut(&mut self, key: &CategoryKey) -> Result<&mut Vec<CardRef>> {
        self.categories
            .get_mut(key)
            .ok_or_else(|| BracketError::UnknownCategory {
                key: key.to_string(),
            })
    }

    fn apply_in_place(&mut self, edit: RuleEdit) -> Result<()> {
        match edit {
            RuleEdit::PutTier { id, tier } => {
                self.tiers.insert(id, tier);
            }
            RuleEdit::UpdateTier { id, update } => {
                let tier = self.tier_mut(id)?;
                if let Some(name) = update.name {
                    tier.name = name;
                }
                if let Some(description) = update.description {
                    tier.description = description;
                }
                tier.limits.extend(update.limits);
                if let Some(banned_cards) = update.banned_cards {
                    tier.banned_cards = banned_cards;
                }
            }
            RuleEdit::RemoveTier { id } => {
                self.tiers
                    .remove(&id)
                    .ok_or(BracketError::TierNotFound { id })?;
            }
            RuleEdit::SetLimit {
                tier,
                category,
                limit,
            } => {
                self.tier_mut(tier)?.limits.insert(category, limit);
            }
            RuleEdit::AddTierBan { tier, card } => {
                let tier = self.tier_mut(tier)?;
                push_unique_name(&mut tier.banned_cards, card);
            }
            RuleEdit::RemoveTierBan { tier, card } => {
                self.tier_mut(tier)?
                    .banned_cards
                    .retain(|banned| !names_match(banned, &card));
            }
            RuleEdit::AddGlobalBan { card } => {
                push_unique_name(&mut self.global_bans, card);
            }
            RuleEdit::RemoveGlobalBan { card } => {
                self.global_bans
                    .retain(|banned| !names_match(banned, &card));
            }
            RuleEdit::AddCard { category, card } => {
                let cards = self.category_mut(&category)?;
                if !cards.iter().any(|existing| existing.matches(&card)) {
                    cards.push(card);
                }
            }
            RuleEdit::RemoveCard {
                category,
                identifier,
            } => {
                let cards = self.category_mut(&category)?;
                if let Some(pos) = cards.iter().position(|card| {
                    card.external_id() == Some(identifier.as_str())
                        || names_match(card.card_name(), &identifier)
                }) {
                    cards.remove(pos);
                }
            }
            RuleEdit::CreateCategory { display_name } => {
                let key = CategoryKey::parse(&to_camel_case(&display_name))?;
                if self.categories.contains_key(&key) {
                    return Err(BracketError::CategoryExists {
                        key: key.to_string(),
                    });
                }
                for tier in self.tiers.values_mut() {
                    tier.limits.insert(key.clone(), Limit::Unlimited);
                }
                self.categories.insert(key, Vec::new());
            }
            RuleEdit::DeleteCategory { key } => {
                if key.is_builtin() {
                    return Err(BracketError::BuiltinCategory {
                        key: key.to_string(),
                    });
                }
                self.categories
                    .remove(&key)
                    .ok_or_else(|| BracketError::UnknownCategory {
                        key: key.to_string(),
                    })?;
                for tier in self.tiers.values_mut() {
                    tier.limits.remove(&key);
                }
            }
        }
        Ok(())
    }
}

fn push_unique_name(list: &mut Vec<String>, card: String) {
    if !list.iter().any(|existing| names_match(existing, &card)) {
        list.push(card);
    }
}

/// Partial update of an existing tier. Limits are merged into the tier's
/// current limits; every other present field replaces the old value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub limits: BTreeMap<CategoryKey, Limit>,
    pub banned_cards: Option<Vec<String>>,
}

/// A single change to a rule model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleEdit {
    /// Insert a tier, replacing any tier with the same id.
    PutTier { id: TierId, tier: Tier },
    UpdateTier { id: TierId, update: TierUpdate },
    RemoveTier { id: TierId },
    SetLimit {
        tier: TierId,
        category: CategoryKey,
        limit: Limit,
    },
    AddTierBan { tier: TierId, card: String },
    RemoveTierBan { tier: TierId, card: String },
    AddGlobalBan { card: String },
    RemoveGlobalBan { card: String },
    AddCard { category: CategoryKey, card: CardRef },
    /// Remove the first entry whose id equals `identifier` or whose name
    /// matches it.
    RemoveCard {
        category: CategoryKey,
        identifier: String,
    },
    /// Create a custom category keyed by the camelCase form of
    /// `display_name`. Every tier gets an unlimited limit for it.
    CreateCategory { display_name: String },
    DeleteCategory { key: CategoryKey },
}
