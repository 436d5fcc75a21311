use crate::handoff::traits::{local_reference, TransactionReceipt, TransactionStep};
use crate::models::SubmissionPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Writes each request as pretty JSON into an outbox directory
pub struct FileTransactionStep {
    outbox: PathBuf,
}

impl FileTransactionStep {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self { outbox: outbox.into() }
    }
}

#[async_trait]
impl TransactionStep for FileTransactionStep {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<TransactionReceipt> {
        tokio::fs::create_dir_all(&self.outbox)
            .await
            .with_context(|| format!("Failed to create outbox {}", self.outbox.display()))?;

        let submitted_at = Utc::now();
        let reference = local_reference();
        let path = self.outbox.join(format!("{}.json", reference));

        let json = serde_json::to_string_pretty(payload)?;
        // Never replace an earlier request
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.flush().await?;
        info!("💾 Saved inspection request to {}", path.display());

        Ok(TransactionReceipt {
            reference,
            destination: path.display().to_string(),
            submitted_at,
        })
    }

    fn step_name(&self) -> &'static str {
        "outbox"
    }
}
