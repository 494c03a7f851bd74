//! Card identity.
//!
//! A card is identified by its name (case-insensitive) and optionally by a
//! stable external identifier supplied by a card database. Category lists may
//! freely mix both forms.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A reference to a card, either by name alone or by name plus external id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCardRef", into = "RawCardRef")]
pub enum CardRef {
    NameOnly(String),
    Identified { name: String, id: String },
}

impl CardRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::NameOnly(name.into())
    }

    pub fn identified(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Identified {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn card_name(&self) -> &str {
        match self {
            Self::NameOnly(name) => name,
            Self::Identified { name, .. } => name,
        }
    }

    pub fn external_id(&self) -> Option<&str> {
        match self {
            Self::NameOnly(_) => None,
            Self::Identified { id, .. } => Some(id),
        }
    }

    /// The identifier this reference is known by: the external id when
    /// present, otherwise the name itself.
    fn identifier(&self) -> &str {
        self.external_id().unwrap_or_else(|| self.card_name())
    }

    /// Whether two references denote the same card.
    ///
    /// Matches when both ids are equal, when one side's id equals the other
    /// side's name-derived identifier, or when the names agree ignoring case.
    pub fn matches(&self, other: &CardRef) -> bool {
        if let (Some(a), Some(b)) = (self.external_id(), other.external_id())
            && a == b
        {
            return true;
        }
        if let Some(id) = self.external_id()
            && id == other.identifier()
        {
            return true;
        }
        if let Some(id) = other.external_id()
            && id == self.identifier()
        {
            return true;
        }
        names_match(self.card_name(), other.card_name())
    }
}

impl From<&str> for CardRef {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.card_name())
    }
}

/// Wire form: a bare string, or an object carrying `name` and `id`
/// (`scryfallId` is accepted for files written by older tooling).
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCardRef {
    Name(String),
    Object {
        name: String,
        #[serde(default, alias = "scryfallId", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl From<RawCardRef> for CardRef {
    fn from(raw: RawCardRef) -> Self {
        match raw {
            RawCardRef::Name(name) => CardRef::NameOnly(name),
            RawCardRef::Object { name, id: None } => CardRef::NameOnly(name),
            RawCardRef::Object { name, id: Some(id) } => CardRef::Identified { name, id },
        }
    }
}

impl From<CardRef> for RawCardRef {
    fn from(card: CardRef) -> Self {
        match card {
            CardRef::NameOnly(name) => RawCardRef::Name(name),
            CardRef::Identified { name, id } => RawCardRef::Object { name, id: Some(id) },
        }
    }
}

/// Case-insensitive name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Precomputed lookup over a list of card references.
///
/// Equivalent to testing [`CardRef::matches`] against every entry, without
/// rescanning the list for each deck card.
#[derive(Debug, Default)]
pub(crate) struct CardIndex {
    names: HashSet<String>,
    ids: HashSet<String>,
}

impl CardIndex {
    pub(crate) fn new<'a>(cards: impl IntoIterator<Item = &'a CardRef>) -> Self {
        let mut index = Self::default();
        for card in cards {
            index.names.insert(normalize_name(card.card_name()));
            if let Some(id) = card.external_id() {
                index.ids.insert(id.to_string());
            }
        }
        index
    }

    pub(crate) fn from_names<'a>(names: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            names: names.into_iter().map(|n| normalize_name(n)).collect(),
            ids: HashSet::new(),
        }
    }

    /// Whether a deck card, known only by name, matches any indexed entry.
    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name)) || self.ids.contains(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_compare_case_insensitively() {
        assert!(CardRef::name("Demonic Tutor").matches(&CardRef::name("demonic TUTOR")));
        assert!(!CardRef::name("Demonic Tutor").matches(&CardRef::name("Vampiric Tutor")));
    }

    #[test]
    fn non_ascii_names_fold() {
        assert!(names_match("Lim-Dûl's Vault", "LIM-DÛL'S VAULT"));
    }

    #[test]
    fn identified_refs_match_by_id_even_when_names_differ() {
        let a = CardRef::identified("Sol Ring", "abc-123");
        let b = CardRef::identified("Sol Ring (Alt Art)", "abc-123");
        assert!(a.matches(&b));
    }

    #[test]
    fn identified_and_name_only_refs_interoperate() {
        let tagged = CardRef::identified("Mana Drain", "id-1");
        assert!(tagged.matches(&CardRef::name("mana drain")));
        assert!(CardRef::name("MANA DRAIN").matches(&tagged));
    }

    #[test]
    fn id_matches_name_derived_identifier() {
        let legacy = CardRef::name("id-1");
        let tagged = CardRef::identified("Mana Drain", "id-1");
        assert!(tagged.matches(&legacy));
        assert!(legacy.matches(&tagged));
    }

    #[test]
    fn wire_forms_deserialize() {
        let cards: Vec<CardRef> = serde_json::from_str(
            r#"["Sol Ring", {"name": "Mana Drain", "id": "x1"}, {"name": "Brainstorm", "scryfallId": "x2"}, {"name": "Ponder"}]"#,
        )
        .expect("valid card list");
        assert_eq!(
            cards,
            vec![
                CardRef::name("Sol Ring"),
                CardRef::identified("Mana Drain", "x1"),
                CardRef::identified("Brainstorm", "x2"),
                CardRef::name("Ponder"),
            ]
        );
        let json = serde_json::to_string(&cards[..2]).expect("serialize");
        assert_eq!(json, r#"["Sol Ring",{"name":"Mana Drain","id":"x1"}]"#);
    }

    #[test]
    fn index_agrees_with_pairwise_matching() {
        let entries = vec![
            CardRef::name("Demonic Tutor"),
            CardRef::identified("Mana Drain", "id-1"),
        ];
        let index = CardIndex::new(&entries);
        for deck_card in ["demonic tutor", "Mana Drain", "id-1", "Sol Ring"] {
            let expected = entries.iter().any(|e| e.matches(&CardRef::name(deck_card)));
            assert_eq!(index.contains_name(deck_card), expected, "{deck_card}");
        }
    }
}
