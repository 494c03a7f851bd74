use serde::{Deserialize, Serialize};

use crate::rules::TierId;

/// A deck as handed to the engine by whatever fetched or parsed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub name: String,
    #[serde(default)]
    pub commanders: Vec<String>,
    /// The non-commander portion of the deck.
    #[serde(default)]
    pub cards: Vec<String>,
    /// Where the deck came from (a site name, a file path, ...).
    #[serde(default)]
    pub source: String,
    /// Bracket claimed by the source. Informational only; never trusted.
    #[serde(default)]
    pub source_bracket: Option<TierId>,
}

impl Deck {
    pub fn new(name: impl Into<String>, commanders: Vec<String>, cards: Vec<String>) -> Self {
        Self {
            name: name.into(),
            commanders,
            cards,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Commanders followed by the rest of the deck, duplicates preserved.
    pub fn all_cards(&self) -> impl Iterator<Item = &str> {
        self.commanders
            .iter()
            .chain(self.cards.iter())
            .map(String::as_str)
    }

    /// Number of cards excluding commanders.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn commander_count(&self) -> usize {
        self.commanders.len()
    }
}
