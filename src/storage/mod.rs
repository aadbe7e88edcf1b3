pub mod json_backend;

use std::path::Path;

use crate::catalog::SiteContent;
use crate::errors::Result;

/// Persistence backends capable of storing the site content document and its snapshots.
pub trait ContentStore: Send + Sync {
    /// The stored document, or the built-in one when nothing is stored yet.
    fn load(&self) -> Result<SiteContent>;
    /// Replaces the stored document wholesale, snapshotting the previous one.
    fn save(&self, content: &SiteContent) -> Result<()>;
    fn backup(&self, note: Option<&str>) -> Result<String>;
    fn list_backups(&self) -> Result<Vec<String>>;
    fn restore(&self, backup_name: &str) -> Result<SiteContent>;

    fn export_to_path(&self, path: &Path) -> Result<()> {
        json_backend::save_content_to_path(&self.load()?, path)
    }

    fn import_from_path(&self, path: &Path) -> Result<SiteContent> {
        let content = json_backend::load_content_from_path(path)?;
        self.save(&content)?;
        Ok(content)
    }
}

pub use json_backend::JsonContentStore;
