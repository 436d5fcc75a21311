use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::TimeSlot;

/// Longest lead time that always leaves a bookable day before the end of
/// next month (31 Jan to 28 Feb is 28 days; one of the last two is not a Sunday)
pub const MAX_LEAD_DAYS: u32 = 27;

/// Constants the inspection workflow runs on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// Fee for one property, or two in the same local government area
    pub base_fee: i64,
    /// Fee for two properties in different local government areas
    pub elevated_fee: i64,
    /// Earliest inspection date, in days after today
    pub lead_days: u32,
    pub time_slots: Vec<TimeSlot>,
    pub default_time: TimeSlot,
    pub currency_symbol: String,
    /// Where the transaction-details step posts requests; `None` writes them to disk
    pub transaction_endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_fee: 10_000,
            elevated_fee: 15_000,
            lead_days: 3,
            time_slots: (9..=17).filter_map(TimeSlot::at_hour).collect(),
            default_time: TimeSlot::default(),
            currency_symbol: "₦".to_string(),
            transaction_endpoint: None,
            request_timeout_secs: 30,
        }
    }
}

impl WorkflowConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse workflow config")?;
        anyhow::ensure!(
            config.time_slots.contains(&config.default_time),
            "default time {} is not one of the configured time slots",
            config.default_time
        );
        anyhow::ensure!(
            config.lead_days <= MAX_LEAD_DAYS,
            "leadDays {} leaves no bookable inspection date (max {})",
            config.lead_days,
            MAX_LEAD_DAYS
        );
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = WorkflowConfig::default();
        assert_eq!(config.base_fee, 10_000);
        assert_eq!(config.elevated_fee, 15_000);
        assert_eq!(config.lead_days, 3);
        assert_eq!(config.default_time.to_string(), "9:00 AM");
        assert_eq!(config.time_slots.len(), 9);
        assert_eq!(config.time_slots.last().unwrap().to_string(), "5:00 PM");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = WorkflowConfig::from_json_str(r#"{"elevatedFee": 20000, "leadDays": 2}"#).unwrap();
        assert_eq!(config.elevated_fee, 20_000);
        assert_eq!(config.lead_days, 2);
        assert_eq!(config.base_fee, 10_000);
    }

    #[test]
    fn test_default_time_must_be_a_slot() {
        let json = r#"{"timeSlots": ["10:00 AM", "11:00 AM"], "defaultTime": "9:00 AM"}"#;
        assert!(WorkflowConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_lead_days_must_leave_a_bookable_date() {
        assert!(WorkflowConfig::from_json_str(r#"{"leadDays": 60}"#).is_err());
        assert!(WorkflowConfig::from_json_str(r#"{"leadDays": 27}"#).is_ok());
    }
}
