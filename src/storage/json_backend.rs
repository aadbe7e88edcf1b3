use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    catalog::SiteContent,
    errors::Result,
    utils::{
        paths::{ensure_dir, PathResolver},
        persistence,
    },
};

use super::ContentStore;

const CONTENT_FILE: &str = "content.json";
const BACKUP_PREFIX: &str = "content";
const AUTO_NOTE: &str = "auto";
const DEFAULT_RETENTION: usize = 5;

/// Keeps the content document as `content.json` plus timestamped snapshots.
#[derive(Debug, Clone)]
pub struct JsonContentStore {
    file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonContentStore {
    /// Store under `<root>/content`, `root` defaulting to the application data directory.
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let dir = PathResolver::content_dir_in(&base);
        ensure_dir(&dir)?;
        let backups_dir = PathResolver::content_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            file: dir.join(CONTENT_FILE),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    /// Store for an explicit document path; snapshots go to a `backups` sibling.
    pub fn with_file(file: PathBuf, retention: Option<usize>) -> Result<Self> {
        let parent = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let backups_dir = parent.join("backups");
        ensure_dir(&backups_dir)?;
        Ok(Self {
            file,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn snapshot_existing(&self, note: Option<&str>) -> Result<Option<String>> {
        if !self.file.exists() {
            return Ok(None);
        }
        let name = self.next_backup_name(note)?;
        fs::copy(&self.file, self.backups_dir.join(&name))?;
        self.prune()?;
        Ok(Some(name))
    }

    fn next_backup_name(&self, note: Option<&str>) -> Result<String> {
        persistence::unique_backup_name(&self.backups_dir, BACKUP_PREFIX, note, Utc::now())
    }

    fn prune(&self) -> Result<()> {
        let removed = persistence::prune_backups(&self.backups_dir, BACKUP_PREFIX, self.retention)?;
        if !removed.is_empty() {
            debug!(count = removed.len(), "pruned content backups");
        }
        Ok(())
    }
}

impl ContentStore for JsonContentStore {
    fn load(&self) -> Result<SiteContent> {
        if self.file.exists() {
            load_content_from_path(&self.file)
        } else {
            debug!(path = %self.file.display(), "no stored content, using built-in document");
            SiteContent::builtin()
        }
    }

    fn save(&self, content: &SiteContent) -> Result<()> {
        self.snapshot_existing(Some(AUTO_NOTE))?;
        save_content_to_path(content, &self.file)?;
        info!(path = %self.file.display(), "content document saved");
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> Result<String> {
        if let Some(name) = self.snapshot_existing(note)? {
            info!(backup = %name, "content backup created");
            return Ok(name);
        }
        let name = self.next_backup_name(note)?;
        save_content_to_path(&SiteContent::builtin()?, &self.backups_dir.join(&name))?;
        self.prune()?;
        info!(backup = %name, "content backup created from built-in document");
        Ok(name)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        persistence::list_backups(&self.backups_dir, BACKUP_PREFIX)
    }

    fn restore(&self, backup_name: &str) -> Result<SiteContent> {
        let path = persistence::backup_path(&self.backups_dir, backup_name)?;
        let content = load_content_from_path(&path)?;
        self.save(&content)?;
        info!(backup = %backup_name, "content restored");
        Ok(content)
    }
}

pub fn save_content_to_path(content: &SiteContent, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    persistence::save_json_atomic(content, path)
}

pub fn load_content_from_path(path: &Path) -> Result<SiteContent> {
    let data = fs::read_to_string(path)?;
    SiteContent::from_json(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonContentStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonContentStore::new(Some(temp.path().to_path_buf()), Some(3))
            .expect("content store");
        (store, temp)
    }

    #[test]
    fn missing_file_loads_builtin() {
        let (store, _guard) = store_with_temp_dir();
        let content = store.load().expect("load");
        assert_eq!(content, SiteContent::builtin().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_snapshots_previous_document() {
        let (store, _guard) = store_with_temp_dir();
        let mut content = store.load().unwrap();
        store.save(&content).unwrap();
        assert!(store.list_backups().unwrap().is_empty());

        content.footer.phone = "0800".into();
        store.save(&content).unwrap();
        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].ends_with("_auto.json"));
        assert_eq!(store.load().unwrap().footer.phone, "0800");
    }

    #[test]
    fn saves_within_a_minute_keep_every_snapshot() {
        let (store, _guard) = store_with_temp_dir();
        let mut content = store.load().unwrap();
        for phone in ["111", "222", "333"] {
            content.footer.phone = phone.into();
            store.save(&content).unwrap();
        }
        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        let phones: Vec<String> = backups
            .iter()
            .map(|name| {
                load_content_from_path(&store.backups_dir().join(name))
                    .unwrap()
                    .footer
                    .phone
            })
            .collect();
        assert_eq!(phones, ["222", "111"]);
    }

    #[test]
    fn retention_is_at_least_one() {
        let temp = TempDir::new().unwrap();
        let store = JsonContentStore::new(Some(temp.path().to_path_buf()), Some(0)).unwrap();
        assert_eq!(store.retention(), 1);
    }
}
