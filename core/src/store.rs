//! On-disk rule store.
//!
//! Holds the current [`RuleModel`] snapshot and persists every change as a
//! pretty-printed JSON [`RuleDocument`]. Each edit produces a new snapshot;
//! readers holding an older `Arc<RuleModel>` keep seeing the old one.
//!
//! ```text
//! rules.json           current rule document
//! rules.json.tmp       write-then-rename staging file
//! rules.json.corrupt   first unreadable file, kept aside on open
//! rules.json.corrupt.N later unreadable files, never overwritten
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::defaults::default_rule_model;
use crate::error::{BracketError, Result};
use crate::rules::{RuleDocument, RuleEdit, RuleModel};

pub struct RuleStore {
    /// `None` for stores that never touch disk.
    path: Option<PathBuf>,
    snapshot: Arc<RuleModel>,
}

impl RuleStore {
    /// Open the store at `path`.
    ///
    /// A missing file is created from the defaults. A file that cannot be
    /// parsed or validated is moved to a free `<file>.corrupt[.N]` backup and
    /// replaced by the defaults. Any I/O failure is returned as is.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let model = if path.exists() {
            match read_model(&path) {
                Ok(model) => {
                    tracing::debug!(path = %path.display(), "loaded rule file");
                    model
                }
                Err(e @ (BracketError::Serde { .. } | BracketError::InvalidInput { .. })) => {
                    let aside = corrupt_backup_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        moved_to = %aside.display(),
                        error = %e,
                        "rule file unreadable, falling back to defaults"
                    );
                    std::fs::rename(&path, &aside).map_err(|e| BracketError::io(&path, e))?;
                    let model = default_rule_model()?;
                    write_model(&path, &model)?;
                    model
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::info!(path = %path.display(), "rule file not found, writing defaults");
            let model = default_rule_model()?;
            write_model(&path, &model)?;
            model
        };

        Ok(Self {
            path: Some(path),
            snapshot: Arc::new(model),
        })
    }

    /// Read the store at `path` without writing anything.
    ///
    /// A missing file yields the defaults in memory. An unreadable file is an
    /// error and stays where it is.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let model = if path.exists() {
            read_model(&path)?
        } else {
            tracing::debug!(path = %path.display(), "rule file not found, using defaults");
            default_rule_model()?
        };
        Ok(Self {
            path: Some(path),
            snapshot: Arc::new(model),
        })
    }

    /// A store that keeps `model` in memory only.
    pub fn in_memory(model: RuleModel) -> Self {
        Self {
            path: None,
            snapshot: Arc::new(model),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<RuleModel> {
        Arc::clone(&self.snapshot)
    }

    /// Apply an edit, persist the result, then publish it as the current
    /// snapshot. On failure the current snapshot is unchanged.
    pub fn apply(&mut self, edit: RuleEdit) -> Result<Arc<RuleModel>> {
        tracing::debug!(?edit, "applying rule edit");
        let next = self.snapshot.apply(edit)?;
        self.replace(next)
    }

    pub fn reset_to_defaults(&mut self) -> Result<Arc<RuleModel>> {
        tracing::info!("resetting rules to defaults");
        self.replace(default_rule_model()?)
    }

    /// Write the current snapshot to `path` as a backup.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        write_model(path, &self.snapshot)
    }

    /// Replace the current rules with the document at `path`. The file is
    /// validated before anything changes.
    pub fn import_from(&mut self, path: &Path) -> Result<Arc<RuleModel>> {
        let model = read_model(path)?;
        tracing::info!(path = %path.display(), "importing rules");
        self.replace(model)
    }

    fn replace(&mut self, model: RuleModel) -> Result<Arc<RuleModel>> {
        if let Some(path) = &self.path {
            write_model(path, &model)?;
        }
        self.snapshot = Arc::new(model);
        Ok(self.snapshot())
    }
}

fn read_model(path: &Path) -> Result<RuleModel> {
    let contents = std::fs::read_to_string(path).map_err(|e| BracketError::io(path, e))?;
    let document: RuleDocument =
        serde_json::from_str(&contents).map_err(|e| BracketError::serde(path, e))?;
    RuleModel::from_document(document)
}

fn write_model(path: &Path, model: &RuleModel) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| BracketError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&model.to_document())
        .map_err(|e| BracketError::serde(path, e))?;
    atomic_write(path, json.as_bytes())
}

/// Write `data` to `path` via a `.tmp` sibling.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = sibling(path, "tmp");
    std::fs::write(&tmp, data).map_err(|e| BracketError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| BracketError::io(path, e))?;
    Ok(())
}

/// `rules.json` + `tmp` -> `rules.json.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// First of `rules.json.corrupt`, `rules.json.corrupt.1`, ... that does not
/// exist yet.
fn corrupt_backup_path(path: &Path) -> PathBuf {
    let first = sibling(path, "corrupt");
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| sibling(path, &format!("corrupt.{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::category::{BuiltinCategory, CategoryKey};
    use crate::card::CardRef;
    use crate::error::ErrorKind;
    use crate::limit::Limit;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("rules.json");
        let store = RuleStore::open(&path).expect("open");
        assert!(path.exists());
        assert_eq!(*store.snapshot(), default_rule_model().expect("defaults"));
    }

    #[test]
    fn edits_persist_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        let mut store = RuleStore::open(&path).expect("open");
        store
            .apply(RuleEdit::AddGlobalBan {
                card: "Sol Ring".into(),
            })
            .expect("ban");
        store
            .apply(RuleEdit::SetLimit {
                tier: 1,
                category: BuiltinCategory::Tutors.into(),
                limit: Limit::Finite(1),
            })
            .expect("limit");
        store
            .apply(RuleEdit::AddCard {
                category: BuiltinCategory::Tutors.into(),
                card: CardRef::identified("Scheming Symmetry", "ss-1"),
            })
            .expect("add card");

        let reopened = RuleStore::open(&path).expect("reopen");
        assert_eq!(*reopened.snapshot(), *store.snapshot());
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn older_snapshots_are_not_mutated() {
        let mut store = RuleStore::in_memory(default_rule_model().expect("defaults"));
        let before = store.snapshot();
        let after = store
            .apply(RuleEdit::RemoveTier { id: 4 })
            .expect("remove");
        assert!(before.tier(4).is_some());
        assert!(after.tier(4).is_none());
    }

    #[test]
    fn failed_edit_keeps_snapshot() {
        let mut store = RuleStore::in_memory(default_rule_model().expect("defaults"));
        let before = store.snapshot();
        let err = store
            .apply(RuleEdit::DeleteCategory {
                key: CategoryKey::Custom("missing".into()),
            })
            .expect_err("unknown");
        assert!(matches!(err, BracketError::UnknownCategory { .. }));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").expect("write");
        let store = RuleStore::open(&path).expect("open");
        assert_eq!(*store.snapshot(), default_rule_model().expect("defaults"));
        let aside = std::fs::read_to_string(sibling(&path, "corrupt")).expect("kept aside");
        assert_eq!(aside, "{ not json");
    }

    #[test]
    fn incomplete_file_is_treated_as_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"globalBans": []}"#).expect("write");
        let store = RuleStore::open(&path).expect("open");
        assert_eq!(store.snapshot().tiers().count(), 4);
        assert!(sibling(&path, "corrupt").exists());
    }

    #[test]
    fn export_then_import_restores() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backup = dir.path().join("backup.json");
        let mut store = RuleStore::open(dir.path().join("rules.json")).expect("open");
        store.export_to(&backup).expect("export");
        store
            .apply(RuleEdit::RemoveTier { id: 1 })
            .expect("remove");
        let restored = store.import_from(&backup).expect("import");
        assert!(restored.tier(1).is_some());
    }

    #[test]
    fn import_rejects_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"tiers": {}}"#).expect("write");
        let mut store = RuleStore::in_memory(default_rule_model().expect("defaults"));
        let before = store.snapshot();
        assert!(store.import_from(&bad).is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn second_corruption_keeps_first_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "first hand edit {").expect("write");
        RuleStore::open(&path).expect("open");
        std::fs::write(&path, "second hand edit {").expect("write");
        RuleStore::open(&path).expect("reopen");

        let first = std::fs::read_to_string(sibling(&path, "corrupt")).expect("first backup");
        let second =
            std::fs::read_to_string(sibling(&path, "corrupt.1")).expect("second backup");
        assert_eq!(first, "first hand edit {");
        assert_eq!(second, "second hand edit {");
    }

    #[test]
    fn io_failure_is_returned_not_recovered() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        std::fs::create_dir(&path).expect("mkdir");
        std::fs::write(path.join("keep.txt"), "mine").expect("write");

        let err = RuleStore::open(&path).err().expect("directory is not a rule file");
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(path.join("keep.txt").exists());
        assert!(!sibling(&path, "corrupt").exists());
    }

    #[test]
    fn load_never_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        let store = RuleStore::load(&path).expect("load");
        assert_eq!(*store.snapshot(), default_rule_model().expect("defaults"));
        assert!(!path.exists());

        std::fs::write(&path, "{ not json").expect("write");
        let err = RuleStore::load(&path).err().expect("corrupt");
        assert!(matches!(err, BracketError::Serde { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("untouched"), "{ not json");
        assert!(!sibling(&path, "corrupt").exists());
    }
}
