use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BracketError;

/// Per-tier ceiling on the number of cards from one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Limit {
    Finite(u32),
    Unlimited,
}

impl Limit {
    /// Whether `count` breaks this limit. Never true for [`Limit::Unlimited`].
    pub fn exceeded_by(&self, count: usize) -> bool {
        match self {
            Self::Finite(n) => count > *n as usize,
            Self::Unlimited => false,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Accepts `unlimited` (any case), `-1` and non-negative integers.
impl std::str::FromStr for Limit {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") || s == "-1" || s == "∞" {
            return Ok(Self::Unlimited);
        }
        s.parse::<u32>().map(Self::Finite).map_err(|_| {
            BracketError::invalid_input(format!(
                "invalid limit \"{s}\": expected a non-negative integer or \"unlimited\""
            ))
        })
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_u32(*n),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// Wire form. `null` is read as unlimited: rule files written by older
/// tooling stored an infinite limit that way.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Count(u64),
    Text(String),
    Null(()),
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match RawLimit::deserialize(deserializer)? {
            RawLimit::Count(n) => u32::try_from(n)
                .map(Limit::Finite)
                .map_err(|_| D::Error::custom(format!("limit {n} is out of range"))),
            RawLimit::Text(text) if text.eq_ignore_ascii_case("unlimited") => Ok(Limit::Unlimited),
            RawLimit::Text(text) => Err(D::Error::custom(format!(
                "invalid limit \"{text}\": expected a non-negative integer or \"unlimited\""
            ))),
            RawLimit::Null(()) => Ok(Limit::Unlimited),
        }
    }
}
