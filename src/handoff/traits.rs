use crate::models::SubmissionPayload;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement from the transaction-details step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub reference: String,
    /// Where the request went (URL or file path)
    pub destination: String,
    pub submitted_at: DateTime<Utc>,
}

/// Receiver of a finished inspection request.
/// The workflow only hands the payload over; payment and the final API call happen behind this trait.
#[async_trait]
pub trait TransactionStep: Send + Sync {
    /// Accept the request for payment and submission
    async fn submit(&self, payload: &SubmissionPayload) -> Result<TransactionReceipt>;

    /// Get the name of the receiving step
    fn step_name(&self) -> &'static str;
}

/// Reference used when the receiver does not hand one back
pub(crate) fn local_reference() -> String {
    format!("INS-{}", Uuid::new_v4().simple())
}
