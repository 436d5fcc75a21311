mod payload;

pub use payload::{PayloadProperty, RequestedBy, SubmissionPayload};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkflowError;

/// Location information for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub state: String,
    pub local_government_area: String,
    pub area: String,
}

/// A listing chosen for inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySelection {
    pub id: String,
    /// Asking price, taken from the sale or rental price of the listing
    pub price: i64,
    pub property_type: String,
    pub location: Location,
    pub documents: Vec<String>,
}

/// Listing record as supplied by the browsing and listing-detail pages.
///
/// Sale listings carry `price`, rentals carry `rentalPrice`; some carry both
/// with one of them zeroed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub brief_type: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub rental_price: Option<i64>,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub docs_on_property: Vec<String>,
}

impl Brief {
    pub fn is_joint_venture(&self) -> bool {
        self.brief_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case("joint venture"))
            .unwrap_or(false)
    }
}

impl TryFrom<Brief> for PropertySelection {
    type Error = WorkflowError;

    fn try_from(brief: Brief) -> Result<Self, Self::Error> {
        let price = brief
            .price
            .filter(|p| *p > 0)
            .or(brief.rental_price.filter(|p| *p > 0))
            .ok_or_else(|| WorkflowError::MissingPrice(brief.id.clone()))?;

        Ok(Self {
            id: brief.id,
            price,
            property_type: brief.property_type,
            location: brief.location,
            documents: brief.docs_on_property,
        })
    }
}

/// An offer being collected for one selected property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationEntry {
    pub property_id: String,
    pub asking_price: i64,
    pub proposed_price: Option<i64>,
}

impl NegotiationEntry {
    pub fn for_property(property: &PropertySelection) -> Self {
        Self {
            property_id: property.id.clone(),
            asking_price: property.price,
            proposed_price: None,
        }
    }
}

/// Inspection fee derived from the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InspectionFeeQuote {
    pub amount: i64,
}

impl InspectionFeeQuote {
    /// Render the fee for display, e.g. `₦15,000`
    pub fn formatted(&self, currency_symbol: &str) -> String {
        format!("{}{}", currency_symbol, format_amount(self.amount))
    }
}

/// Group digits in thousands, e.g. `1,250,000`
pub(crate) fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// An hour mark offered for inspections, shown as `9:00 AM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(u32);

impl TimeSlot {
    pub fn at_hour(hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self(hour))
    }

    pub fn hour(&self) -> u32 {
        self.0
    }
}

impl Default for TimeSlot {
    /// 9:00 AM, the first slot of the day
    fn default() -> Self {
        Self(9)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour, meridiem) = match self.0 {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{}:00 {}", hour, meridiem)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid time slot: {:?}", s);

        let (hour, rest) = s.trim().split_once(':').ok_or_else(invalid)?;
        let (minutes, meridiem) = rest.trim().split_once(' ').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        if minutes != "00" || !(1..=12).contains(&hour) {
            return Err(invalid());
        }

        let hour = match meridiem.trim().to_ascii_uppercase().as_str() {
            "AM" => hour % 12,
            "PM" => hour % 12 + 12,
            _ => return Err(invalid()),
        };
        Ok(Self(hour))
    }
}
