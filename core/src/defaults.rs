//! The built-in rule set: four brackets, the official Commander ban list, and
//! seed lists for the built-in categories.

use crate::error::{BracketError, Result};
use crate::rules::RuleModel;

const DEFAULT_RULES_JSON: &str = include_str!("default_rules.json");

/// Build the default rule model.
pub fn default_rule_model() -> Result<RuleModel> {
    RuleModel::from_json(DEFAULT_RULES_JSON).map_err(|e| {
        BracketError::invalid_input(format!("embedded default rules are invalid: {e}"))
    })
}
