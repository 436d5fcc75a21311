use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::models::{RequestedBy, TimeSlot};

/// Requester details as typed into the contact form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    /// Any non-empty text; the phone widget upstream does the formatting
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,

    #[validate(email(message = "Invalid email address"))]
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactForm {
    pub fn new(full_name: impl Into<String>, phone_number: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            email: Some(email.into()),
        }
    }

    fn normalized(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }

    /// Validate the form and turn it into the payload's `requestedBy`
    pub fn validated(&self) -> Result<RequestedBy> {
        let form = self.normalized();
        form.validate()?;
        Ok(RequestedBy {
            full_name: form.full_name,
            phone_number: form.phone_number,
            email: form.email,
        })
    }
}

/// Single-form request used when negotiating straight from a listing page:
/// offer, inspection slot and contact details in one go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectNegotiationForm {
    #[serde(default)]
    pub proposed_price: Option<i64>,
    pub inspection_date: NaiveDate,
    pub inspection_time: TimeSlot,
    #[serde(flatten)]
    pub contact: ContactForm,
}
