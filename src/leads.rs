use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::info;

const CSV_HEADER: &str = "\"Timestamp\",\"Name\",\"Email\",\"Product\"\n";

/// Append-only lead log, one CSV file per product.
///
/// Appends to the same product's file are serialized through a per-slug
/// async mutex so a submission is always one intact line, independent of
/// the platform's append semantics.
pub struct LeadStore {
    leads_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl LeadStore {
    pub fn new(leads_dir: impl Into<PathBuf>) -> Self {
        Self {
            leads_dir: leads_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Append one lead record, creating the file with a header row on first
    /// use. The record is written before any email send is attempted; a
    /// failure here aborts the whole request.
    pub async fn record(&self, product_slug: &str, name: &str, email: &str) -> Result<()> {
        let lock = self.file_lock(product_slug);
        let _guard = lock.lock().await;

        let leads_file = self.leads_file(product_slug);
        tokio::fs::create_dir_all(&self.leads_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.leads_dir.display()))?;

        if !tokio::fs::try_exists(&leads_file).await? {
            tokio::fs::write(&leads_file, CSV_HEADER)
                .await
                .with_context(|| format!("Failed to create {}", leads_file.display()))?;
        }

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format!(
            "{},{},{},{}\n",
            csv_field(&timestamp),
            csv_field(name),
            csv_field(email),
            csv_field(product_slug),
        );

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&leads_file)
            .await
            .with_context(|| format!("Failed to open {}", leads_file.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", leads_file.display()))?;

        info!("Lead saved [{}]: {}", product_slug, email);
        Ok(())
    }

    pub fn leads_file(&self, product_slug: &str) -> PathBuf {
        self.leads_dir.join(format!("{product_slug}-leads.csv"))
    }

    fn file_lock(&self, product_slug: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(product_slug.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Quote a CSV field, doubling embedded quote characters so a hostile name
/// or email cannot corrupt the field structure.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
