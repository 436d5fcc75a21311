use chrono::NaiveDate;
use thiserror::Error;

use crate::models::TimeSlot;
use crate::workflow::Step;

/// Errors raised by the inspection request workflow.
///
/// Every variant leaves the workflow where it was: a rejected action never
/// partially commits into the payload.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("cannot {action} while on step {from}")]
    InvalidTransition { from: Step, action: &'static str },

    #[error("property {0} is not in the current selection")]
    PropertyNotSelected(String),

    #[error("no properties selected for inspection")]
    EmptySelection,

    #[error("offer of {proposed} exceeds the asking price of {asking}")]
    PriceAboveAsking { proposed: i64, asking: i64 },

    #[error("invalid price input: {0:?}")]
    InvalidPrice(String),

    #[error("listing {0} has neither a sale nor a rental price")]
    MissingPrice(String),

    #[error("{0} is not an available inspection date")]
    DateUnavailable(NaiveDate),

    #[error("{0} is not an available inspection time")]
    TimeUnavailable(TimeSlot),

    #[error("a letter of intention is required for joint venture requests")]
    MissingLetterOfIntent,

    #[error("form validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("transaction hand-off failed: {0:#}")]
    Handoff(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
