//! Error types for the bracket engine and rule store.
//!
//! The classification engine itself only ever fails with
//! [`BracketError::InvalidInput`]; the remaining variants come from rule
//! edits and the on-disk rule store.

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::TierId;

/// Error category for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Deck or rule model missing or malformed
    InvalidInput,
    /// A rule edit referenced something that does not exist, or collided
    /// with something that does
    RuleEdit,
    /// Reading or writing the rule file failed
    Storage,
}

impl ErrorKind {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::RuleEdit => "RULE_EDIT",
            Self::Storage => "STORAGE",
        }
    }
}

#[derive(Debug, Error)]
pub enum BracketError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("bracket {id} does not exist")]
    TierNotFound { id: TierId },

    #[error("category \"{key}\" does not exist")]
    UnknownCategory { key: String },

    #[error("category \"{key}\" already exists")]
    CategoryExists { key: String },

    #[error("cannot remove built-in category \"{key}\"")]
    BuiltinCategory { key: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule file {}: {source}", path.display())]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BracketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::TierNotFound { .. }
            | Self::UnknownCategory { .. }
            | Self::CategoryExists { .. }
            | Self::BuiltinCategory { .. } => ErrorKind::RuleEdit,
            Self::Io { .. } | Self::Serde { .. } => ErrorKind::Storage,
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serde(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serde {
            path: path.into(),
            source,
        }
    }
}

/// Result type for bracket operations
pub type Result<T> = std::result::Result<T, BracketError>;
