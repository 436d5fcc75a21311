use crate::config::WorkflowConfig;
use crate::handoff::traits::{local_reference, TransactionReceipt, TransactionStep};
use crate::models::SubmissionPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Posts the request as JSON to the transaction-details service
pub struct HttpTransactionStep {
    client: Client,
    endpoint: String,
}

/// Fields we read back from the service; anything else is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    #[serde(alias = "_id", alias = "id")]
    reference: Option<String>,
}

impl HttpTransactionStep {
    pub fn new(endpoint: impl Into<String>, config: &WorkflowConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

fn parse_response(body: &str) -> SubmitResponse {
    serde_json::from_str(body).unwrap_or_else(|err| {
        warn!(error = %err, body, "Unreadable transaction service response, using a local reference");
        SubmitResponse::default()
    })
}

#[async_trait]
impl TransactionStep for HttpTransactionStep {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<TransactionReceipt> {
        info!("Posting inspection request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .context("Failed to reach transaction service")?
            .error_for_status()
            .context("Transaction service rejected the request")?;

        let body = response.text().await.context("Failed to read response body")?;
        debug!("Transaction service replied: {}", body);
        let parsed = parse_response(&body);

        Ok(TransactionReceipt {
            reference: parsed.reference.unwrap_or_else(local_reference),
            destination: self.endpoint.clone(),
            submitted_at: Utc::now(),
        })
    }

    fn step_name(&self) -> &'static str {
        "transaction-service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_reference_aliases() {
        let parsed: SubmitResponse = serde_json::from_str(r#"{"_id": "abc", "status": "ok"}"#).unwrap();
        assert_eq!(parsed.reference.as_deref(), Some("abc"));
        let parsed: SubmitResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(parsed.reference.is_none());
    }

    #[test]
    fn test_malformed_response_falls_back() {
        assert!(parse_response("<html>502 Bad Gateway</html>").reference.is_none());
        assert!(parse_response("").reference.is_none());
        assert_eq!(parse_response(r#"{"reference": "TX-1"}"#).reference.as_deref(), Some("TX-1"));
    }
}
