//! Card categories.
//!
//! Four built-in categories always exist; rule models may add custom ones at
//! runtime. Keys order built-ins first (in declaration order), then custom
//! keys alphabetically, which fixes the iteration order of every map keyed by
//! category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::CardRef;
use crate::error::{BracketError, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum BuiltinCategory {
    Tutors,
    TwoCardCombos,
    GameChangers,
    LandDenial,
}

impl BuiltinCategory {
    pub const ALL: [BuiltinCategory; 4] = [
        Self::Tutors,
        Self::TwoCardCombos,
        Self::GameChangers,
        Self::LandDenial,
    ];

    /// Wire name used as the JSON key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tutors => "tutors",
            Self::TwoCardCombos => "twoCardCombos",
            Self::GameChangers => "gameChangers",
            Self::LandDenial => "landDenial",
        }
    }

    fn from_wire(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == key)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryKey {
    Builtin(BuiltinCategory),
    Custom(String),
}

impl CategoryKey {
    /// Parse a category key.
    ///
    /// Rejects empty keys and custom keys that differ from a built-in name
    /// only by case.
    pub fn parse(key: &str) -> Result<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(BracketError::invalid_input("category key must not be empty"));
        }
        if let Some(builtin) = BuiltinCategory::from_wire(key) {
            return Ok(Self::Builtin(builtin));
        }
        if let Some(builtin) = BuiltinCategory::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(key))
        {
            return Err(BracketError::invalid_input(format!(
                "category \"{key}\" collides with built-in category \"{}\"",
                builtin.as_str()
            )));
        }
        Ok(Self::Custom(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Builtin(b) => b.as_str(),
            Self::Custom(key) => key,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Human-readable name: `twoCardCombos` becomes `Two Card Combos`.
    pub fn display_name(&self) -> String {
        format_category_name(self.as_str())
    }
}

impl From<BuiltinCategory> for CategoryKey {
    fn from(builtin: BuiltinCategory) -> Self {
        Self::Builtin(builtin)
    }
}

impl TryFrom<String> for CategoryKey {
    type Error = BracketError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CategoryKey> for String {
    fn from(key: CategoryKey) -> Self {
        match key {
            CategoryKey::Builtin(b) => b.as_str().to_string(),
            CategoryKey::Custom(key) => key,
        }
    }
}

impl std::str::FromStr for CategoryKey {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a camelCase key into title-cased words.
pub fn format_category_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a free-form display name into a camelCase category key.
///
/// Every run of non-alphanumeric characters is dropped and the character
/// following it uppercased; the first character is lowercased.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.trim().chars() {
        if !ch.is_alphanumeric() {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = false;
    }
    out
}

/// Category name → flagged cards. Built-in categories are always present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<CategoryKey, Vec<CardRef>>")]
pub struct CategorySet(BTreeMap<CategoryKey, Vec<CardRef>>);

impl CategorySet {
    pub fn new(mut entries: BTreeMap<CategoryKey, Vec<CardRef>>) -> Self {
        for builtin in BuiltinCategory::ALL {
            entries.entry(builtin.into()).or_default();
        }
        Self(entries)
    }

    pub fn get(&self, key: &CategoryKey) -> Option<&[CardRef]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &CategoryKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &[CardRef])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get_mut(&mut self, key: &CategoryKey) -> Option<&mut Vec<CardRef>> {
        self.0.get_mut(key)
    }

    pub(crate) fn insert(&mut self, key: CategoryKey, cards: Vec<CardRef>) {
        self.0.insert(key, cards);
    }

    pub(crate) fn remove(&mut self, key: &CategoryKey) -> Option<Vec<CardRef>> {
        self.0.remove(key)
    }
}

impl From<BTreeMap<CategoryKey, Vec<CardRef>>> for CategorySet {
    fn from(entries: BTreeMap<CategoryKey, Vec<CardRef>>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_builtin_and_custom_keys() {
        assert_eq!(
            CategoryKey::parse("tutors").expect("builtin"),
            CategoryKey::Builtin(BuiltinCategory::Tutors)
        );
        assert_eq!(
            CategoryKey::parse("fastMana").expect("custom"),
            CategoryKey::Custom("fastMana".into())
        );
    }

    #[test]
    fn rejects_empty_and_colliding_keys() {
        assert!(CategoryKey::parse("  ").is_err());
        let err = CategoryKey::parse("Tutors").expect_err("collision");
        assert!(err.to_string().contains("collides"), "{err}");
    }

    #[test]
    fn builtins_sort_before_custom_keys() {
        let mut keys = vec![
            CategoryKey::Custom("alpha".into()),
            CategoryKey::Builtin(BuiltinCategory::LandDenial),
            CategoryKey::Builtin(BuiltinCategory::Tutors),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CategoryKey::Builtin(BuiltinCategory::Tutors),
                CategoryKey::Builtin(BuiltinCategory::LandDenial),
                CategoryKey::Custom("alpha".into()),
            ]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(format_category_name("twoCardCombos"), "Two Card Combos");
        assert_eq!(format_category_name("tutors"), "Tutors");
        assert_eq!(
            CategoryKey::from(BuiltinCategory::LandDenial).display_name(),
            "Land Denial"
        );
    }

    #[test]
    fn camel_case_keys() {
        assert_eq!(to_camel_case("Fast Mana"), "fastMana");
        assert_eq!(to_camel_case("  extra-turn spells "), "extraTurnSpells");
        assert_eq!(to_camel_case("Stax"), "stax");
        assert_eq!(to_camel_case("!!!"), "");
    }

    #[test]
    fn category_set_always_has_builtins() {
        let set: CategorySet =
            serde_json::from_str(r#"{"fastMana": ["Mana Crypt"]}"#).expect("valid set");
        assert_eq!(set.len(), 5);
        for builtin in BuiltinCategory::ALL {
            assert_eq!(set.get(&builtin.into()), Some(&[][..]));
        }
        let json = serde_json::to_value(&set).expect("serialize");
        assert_eq!(json["fastMana"], serde_json::json!(["Mana Crypt"]));
    }
}
