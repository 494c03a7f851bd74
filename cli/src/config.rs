//! CLI configuration loading
//!
//! Loads configuration from `~/.config/bracket/config.toml` (or `BRACKET_CONFIG` env).
//! Every field is optional; an absent file means defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

const KNOWN_LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BracketCliConfig {
    /// Path to the rule file. A leading `~/` is expanded.
    #[serde(default = "default_rules_path")]
    pub rules_path: String,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rules_path() -> String {
    dirs::home_dir()
        .map(|h| {
            h.join(".config")
                .join("bracket")
                .join("rules.json")
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|| "rules.json".to_string())
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BracketCliConfig {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            log_level: default_log_level(),
        }
    }
}

impl BracketCliConfig {
    /// Environment variable overriding the config file location
    pub const ENV_CONFIG_PATH: &'static str = "BRACKET_CONFIG";

    const DEFAULT_CONFIG_FILENAME: &'static str = "config.toml";

    /// Load configuration from `explicit`, else from the resolved default
    /// location. A missing file at the default location yields defaults; a
    /// missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let path = Self::resolve_config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("failed to parse config")
    }

    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("bracket")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    /// Warn about suspicious values. Call after logging is installed.
    pub fn validate(&self) {
        let level = self.log_level.trim().to_ascii_lowercase();
        if !KNOWN_LOG_LEVELS.contains(&level.as_str()) {
            tracing::warn!(
                log_level = %self.log_level,
                "unrecognized log_level, treating it as a filter directive"
            );
        }

        if self.rules_path.trim().is_empty() {
            tracing::warn!("rules_path is empty; rule file will be created in the working directory");
        }
    }

    /// Get the resolved rule file path (expanding ~ if needed)
    pub fn resolved_rules_path(&self) -> PathBuf {
        let path = &self.rules_path;
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = BracketCliConfig::default();
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.rules_path.ends_with("rules.json"));
    }

    #[test]
    fn test_parse_partial_config() {
        let cfg = BracketCliConfig::parse(r#"log_level = "debug""#).expect("parse");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.rules_path, default_rules_path());
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(BracketCliConfig::parse("rules_path = ").is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let cfg = BracketCliConfig {
            rules_path: "~/decks/rules.json".to_string(),
            ..Default::default()
        };
        let resolved = cfg.resolved_rules_path();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolved, home.join("decks/rules.json"));
        }
        assert!(!resolved.to_string_lossy().starts_with("~/"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = BracketCliConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rules_path = \"/tmp/r.json\"\n").expect("write");
        let cfg = BracketCliConfig::load(Some(&path)).expect("load");
        assert_eq!(cfg.resolved_rules_path(), PathBuf::from("/tmp/r.json"));
    }
}
