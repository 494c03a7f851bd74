use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::CategoryKey;
use crate::rules::TierId;

/// Why a verdict came out the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictReason {
    #[serde(rename = "Contains globally banned cards")]
    GloballyBanned,
    #[serde(rename = "Exceeds all bracket limits")]
    ExceedsAllTiers,
    #[serde(rename = "Fits bracket requirements")]
    Fits,
}

impl VerdictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GloballyBanned => "Contains globally banned cards",
            Self::ExceedsAllTiers => "Exceeds all bracket limits",
            Self::Fits => "Fits bracket requirements",
        }
    }
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of analyzing one deck. A `None` tier is a normal result, not an
/// error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub tier: Option<TierId>,
    pub tier_name: Option<String>,
    pub reason: VerdictReason,
    pub banned_cards_found: Vec<String>,
    pub violations: Vec<String>,
    pub category_counts: BTreeMap<CategoryKey, usize>,
    pub found_cards: BTreeMap<CategoryKey, Vec<String>>,
}

impl Verdict {
    pub(crate) fn globally_banned(banned_cards_found: Vec<String>) -> Self {
        Self {
            tier: None,
            tier_name: None,
            reason: VerdictReason::GloballyBanned,
            banned_cards_found,
            violations: Vec::new(),
            category_counts: BTreeMap::new(),
            found_cards: BTreeMap::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.tier.is_some()
    }

    pub fn has_banned_cards(&self) -> bool {
        !self.banned_cards_found.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Sum of all category counts. A card in two categories counts twice.
    pub fn total_flagged_cards(&self) -> usize {
        self.category_counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::category::BuiltinCategory;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_with_wire_field_names() {
        let mut verdict = Verdict::globally_banned(vec!["Black Lotus".into()]);
        verdict
            .category_counts
            .insert(BuiltinCategory::Tutors.into(), 0);
        let json = serde_json::to_value(&verdict).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "tier": null,
                "tierName": null,
                "reason": "Contains globally banned cards",
                "bannedCardsFound": ["Black Lotus"],
                "violations": [],
                "categoryCounts": {"tutors": 0},
                "foundCards": {},
            })
        );
    }

    #[test]
    fn totals_and_flags() {
        let mut verdict = Verdict::globally_banned(Vec::new());
        verdict
            .category_counts
            .insert(BuiltinCategory::Tutors.into(), 2);
        verdict
            .category_counts
            .insert(BuiltinCategory::LandDenial.into(), 1);
        assert_eq!(verdict.total_flagged_cards(), 3);
        assert!(!verdict.is_valid());
        assert!(!verdict.has_banned_cards());
        assert!(!verdict.has_violations());
    }
}
