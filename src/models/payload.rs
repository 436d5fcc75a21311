use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// One selected property as it appears in the outbound request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadProperty {
    pub property_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation_price: Option<i64>,
}

/// Contact details of the person requesting the inspection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedBy {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Inspection request handed to the transaction-details step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub properties: Vec<PayloadProperty>,
    pub is_negotiating: bool,
    pub inspection_date: NaiveDate,
    pub inspection_time: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<RequestedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_of_intention: Option<String>,
    /// Filled in by the transaction-details step (bank, receipt, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<serde_json::Value>,
}

impl SubmissionPayload {
    pub fn new(inspection_date: NaiveDate, inspection_time: TimeSlot) -> Self {
        Self {
            properties: Vec::new(),
            is_negotiating: false,
            inspection_date,
            inspection_time,
            requested_by: None,
            letter_of_intention: None,
            transaction: None,
        }
    }

    pub fn negotiation_price(&self, property_id: &str) -> Option<i64> {
        self.properties
            .iter()
            .find(|p| p.property_id == property_id)
            .and_then(|p| p.negotiation_price)
    }
}
