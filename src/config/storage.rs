use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations of the on-disk collaborators: lead logs, email templates and
/// guide attachments. Populated externally; only the leads directory is
/// written to by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub leads_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub ebooks_dir: PathBuf,
}

impl StorageConfig {
    /// Create the storage directories if they do not exist yet.
    pub async fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.leads_dir, &self.templates_dir, &self.ebooks_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            leads_dir: "leads".into(),
            templates_dir: "templates".into(),
            ebooks_dir: "ebooks".into(),
        }
    }
}
