//! Local JSON snapshot used when the remote store is unreachable
//!
//! A snapshot is a single JSON array of records stored under a fixed key in
//! the data directory. It is read at startup when the remote store is
//! unavailable and rewritten after every local mutation.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::Result;
use super::remote::{decode_rows, Record};

/// A snapshot file keyed by name inside a data directory
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    dir: PathBuf,
    key: String,
}

impl LocalSnapshot {
    pub fn new<P: AsRef<Path>>(dir: P, key: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            key: key.to_string(),
        }
    }

    /// Snapshot stored next to this one under `{key}-{suffix}`
    pub fn sibling(&self, suffix: &str) -> Self {
        Self {
            dir: self.dir.clone(),
            key: format!("{}-{}", self.key, suffix),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    /// Where a damaged snapshot is kept before it gets rewritten
    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json.bak", self.key))
    }

    /// Load records from disk
    ///
    /// Returns `None` when the file is missing. Records are decoded one by
    /// one and bad ones are skipped; the original file is copied to
    /// `backup_path` first. A file that is not a JSON array is moved there
    /// and treated as missing.
    pub fn load<T: Record>(&self) -> Result<Option<Vec<T>>> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let rows = match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(rows) => rows,
            Err(e) => {
                fs::rename(&path, self.backup_path())?;
                tracing::warn!(
                    "Unreadable snapshot {:?} moved to {:?}: {}",
                    path,
                    self.backup_path(),
                    e
                );
                return Ok(None);
            }
        };

        let total = rows.len();
        let records = decode_rows::<T>(rows);
        if records.len() < total {
            fs::copy(&path, self.backup_path())?;
            tracing::warn!(
                "Skipped {} bad records in {:?}; original kept at {:?}",
                total - records.len(),
                path,
                self.backup_path()
            );
        }
        Ok(Some(records))
    }

    /// Save records to disk
    pub fn save<T: Serialize>(&self, records: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let tmp = self.dir.join(format!(".{}.json.tmp", self.key));
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!("Wrote {} records to {:?}", records.len(), path);
        Ok(())
    }

    /// Delete the snapshot file; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Deleted: {:?}", path);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Platform, SocialDraft};
    use chrono::Utc;
    use tempfile::TempDir;

    fn draft(content: &str) -> SocialDraft {
        SocialDraft::new(Platform::Twitter, content.to_string(), None, Utc::now())
    }

    #[test]
    fn test_missing_snapshot_loads_none() {
        let dir = TempDir::new().unwrap();
        let snapshot = LocalSnapshot::new(dir.path(), "drafts");
        assert!(snapshot.load::<SocialDraft>().unwrap().is_none());
        assert!(!snapshot.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let snapshot = LocalSnapshot::new(dir.path().join("data"), "drafts");
        let drafts = vec![draft("a"), draft("b")];
        snapshot.save(&drafts).unwrap();
        assert_eq!(snapshot.load::<SocialDraft>().unwrap(), Some(drafts));
        assert!(snapshot.path().ends_with("data/drafts.json"));
        assert!(!snapshot.backup_path().exists());
    }

    #[test]
    fn test_unparsable_snapshot_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let snapshot = LocalSnapshot::new(dir.path(), "drafts");
        fs::write(snapshot.path(), "{ not json").unwrap();

        assert!(snapshot.load::<SocialDraft>().unwrap().is_none());
        assert!(!snapshot.path().exists());
        assert_eq!(
            fs::read_to_string(snapshot.backup_path()).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_bad_record_skipped_and_backed_up() {
        let dir = TempDir::new().unwrap();
        let snapshot = LocalSnapshot::new(dir.path(), "drafts");
        let good = draft("keep me");
        let mut rows = vec![serde_json::to_value(&good).unwrap()];
        rows.push(serde_json::json!({"id": "nope", "platform": "myspace"}));
        let raw = serde_json::to_string(&rows).unwrap();
        fs::write(snapshot.path(), &raw).unwrap();

        assert_eq!(snapshot.load::<SocialDraft>().unwrap(), Some(vec![good]));
        assert_eq!(fs::read_to_string(snapshot.backup_path()).unwrap(), raw);
    }

    #[test]
    fn test_sibling_and_clear() {
        let dir = TempDir::new().unwrap();
        let posts = LocalSnapshot::new(dir.path(), "blog");
        let drafts = posts.sibling("drafts");
        assert!(drafts.path().ends_with("blog-drafts.json"));

        drafts.save::<String>(&[]).unwrap();
        assert!(drafts.clear().unwrap());
        assert!(!drafts.clear().unwrap());
    }
}
