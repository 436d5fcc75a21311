//! Walks the selection one property at a time, collecting an optional
//! counter-offer for each.
//!
//! An offer above the asking price never gets recorded: the keystroke that
//! would produce it is rejected and the field keeps its previous value.

use tracing::{debug, info, warn};

use super::selection::SelectionSet;
use super::Step;
use crate::error::{Result, WorkflowError};
use crate::models::{format_amount, NegotiationEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Negotiating { index: usize },
    Done,
}

/// Result of typing into the "your price" field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceInput {
    /// The field now holds this value; `None` when cleared
    Accepted(Option<i64>),
    /// The field was left unchanged
    Rejected { warning: String },
}

#[derive(Debug, Clone)]
pub struct NegotiationSequencer {
    state: NegotiationState,
    entries: Vec<NegotiationEntry>,
}

impl Default for NegotiationSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl NegotiationSequencer {
    pub fn new() -> Self {
        Self {
            state: NegotiationState::Idle,
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, NegotiationState::Negotiating { .. })
    }

    /// Start negotiating on `property_id`.
    ///
    /// The negotiation list mirrors the selection as it is now; `existing`
    /// seeds each entry with an offer recorded earlier, if any.
    pub fn open<F>(&mut self, selection: &SelectionSet, property_id: &str, existing: F) -> Result<&NegotiationEntry>
    where
        F: Fn(&str) -> Option<i64>,
    {
        if self.is_active() {
            return Err(WorkflowError::InvalidTransition {
                from: Step::Negotiation,
                action: "open negotiation",
            });
        }

        let index = selection
            .position(property_id)
            .ok_or_else(|| WorkflowError::PropertyNotSelected(property_id.to_string()))?;

        self.entries = selection
            .iter()
            .map(|property| {
                let mut entry = NegotiationEntry::for_property(property);
                entry.proposed_price = existing(&property.id).filter(|p| *p > 0 && *p <= entry.asking_price);
                entry
            })
            .collect();
        self.state = NegotiationState::Negotiating { index };

        info!(property_id, index, of = self.entries.len(), "Opened price negotiation");
        Ok(&self.entries[index])
    }

    pub fn current(&self) -> Option<&NegotiationEntry> {
        match self.state {
            NegotiationState::Negotiating { index } => self.entries.get(index),
            _ => None,
        }
    }

    fn current_mut(&mut self) -> Option<&mut NegotiationEntry> {
        match self.state {
            NegotiationState::Negotiating { index } => self.entries.get_mut(index),
            _ => None,
        }
    }

    /// Apply the raw text of the price field.
    ///
    /// Thousands separators and spaces are ignored; empty text clears the offer.
    pub fn enter_price(&mut self, raw: &str) -> PriceInput {
        let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();

        let candidate = if cleaned.is_empty() {
            None
        } else {
            match cleaned.parse::<i64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    return PriceInput::Rejected {
                        warning: "Enter a valid amount".to_string(),
                    }
                }
            }
        };

        match self.set_price(candidate) {
            Ok(()) => PriceInput::Accepted(candidate),
            Err(err) => PriceInput::Rejected {
                warning: self.warning_for(&err),
            },
        }
    }

    /// Set the offer for the current property, enforcing `0 < price <= asking`
    pub fn set_price(&mut self, price: Option<i64>) -> Result<()> {
        let entry = self.current_mut().ok_or(WorkflowError::InvalidTransition {
            from: Step::Selection,
            action: "enter a price",
        })?;

        match price {
            Some(p) if p <= 0 => Err(WorkflowError::InvalidPrice(p.to_string())),
            Some(p) if p > entry.asking_price => {
                warn!(
                    property_id = %entry.property_id,
                    proposed = p,
                    asking = entry.asking_price,
                    "Rejected offer above asking price"
                );
                Err(WorkflowError::PriceAboveAsking {
                    proposed: p,
                    asking: entry.asking_price,
                })
            }
            _ => {
                entry.proposed_price = price;
                Ok(())
            }
        }
    }

    fn warning_for(&self, err: &WorkflowError) -> String {
        match err {
            WorkflowError::PriceAboveAsking { asking, .. } => {
                format!("Your price cannot be higher than the asking price of {}", format_amount(*asking))
            }
            WorkflowError::InvalidPrice(_) => "Price must be greater than zero".to_string(),
            other => other.to_string(),
        }
    }

    /// Commit the current property's offer and move to the next property.
    ///
    /// Returns the committed entry; after the last property the sequencer is `Done`.
    pub fn submit(&mut self) -> Result<NegotiationEntry> {
        let NegotiationState::Negotiating { index } = self.state else {
            return Err(WorkflowError::InvalidTransition {
                from: Step::Selection,
                action: "submit negotiation",
            });
        };

        let committed = self.entries[index].clone();
        self.state = if index + 1 < self.entries.len() {
            NegotiationState::Negotiating { index: index + 1 }
        } else {
            NegotiationState::Done
        };

        debug!(
            property_id = %committed.property_id,
            proposed = ?committed.proposed_price,
            state = ?self.state,
            "Submitted negotiation"
        );
        Ok(committed)
    }

    /// Close negotiation without recording the offer being typed
    pub fn cancel(&mut self) {
        if let Some(entry) = self.current() {
            debug!(property_id = %entry.property_id, "Negotiation cancelled");
        }
        self.entries.clear();
        self.state = NegotiationState::Done;
    }
}
