//! Owner of the outbound inspection request.
//!
//! Each workflow step writes only its own fields through a named operation.
//! Rebuilding the property list after the selection changes keeps any offer
//! already recorded for a property id that is still selected.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use super::schedule::available_dates;
use super::selection::SelectionSet;
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::models::{NegotiationEntry, PayloadProperty, RequestedBy, SubmissionPayload, TimeSlot};

#[derive(Debug, Clone)]
pub struct PayloadAssembler {
    payload: SubmissionPayload,
    available_dates: Vec<NaiveDate>,
    time_slots: Vec<TimeSlot>,
}

impl PayloadAssembler {
    /// Empty request defaulting to the first available date and the configured default time
    pub fn new(today: NaiveDate, config: &WorkflowConfig) -> Self {
        let available_dates = available_dates(today, config.lead_days);
        let first_date = available_dates.first().copied().unwrap_or(today);

        Self {
            payload: SubmissionPayload::new(first_date, config.default_time),
            available_dates,
            time_slots: config.time_slots.clone(),
        }
    }

    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available_dates
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// Rebuild `properties` in selection order, carrying offers over by id
    pub fn sync_properties(&mut self, selection: &SelectionSet) {
        let mut offers: HashMap<String, i64> = self
            .payload
            .properties
            .drain(..)
            .filter_map(|p| p.negotiation_price.map(|price| (p.property_id, price)))
            .collect();

        self.payload.properties = selection
            .iter()
            .map(|property| PayloadProperty {
                property_id: property.id.clone(),
                negotiation_price: offers.remove(&property.id),
            })
            .collect();
        self.refresh_negotiating();

        debug!(
            properties = self.payload.properties.len(),
            dropped_offers = offers.len(),
            "Synced request properties with selection"
        );
    }

    /// Record the offer from one negotiation step; other properties are untouched
    pub fn merge_negotiation(&mut self, entry: &NegotiationEntry) {
        match self
            .payload
            .properties
            .iter_mut()
            .find(|p| p.property_id == entry.property_id)
        {
            Some(property) => property.negotiation_price = entry.proposed_price,
            None => self.payload.properties.push(PayloadProperty {
                property_id: entry.property_id.clone(),
                negotiation_price: entry.proposed_price,
            }),
        }
        self.refresh_negotiating();
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Result<()> {
        if !self.available_dates.contains(&date) {
            return Err(WorkflowError::DateUnavailable(date));
        }
        self.payload.inspection_date = date;
        Ok(())
    }

    pub fn set_time(&mut self, time: TimeSlot) -> Result<()> {
        if !self.time_slots.contains(&time) {
            return Err(WorkflowError::TimeUnavailable(time));
        }
        self.payload.inspection_time = time;
        Ok(())
    }

    /// Set both or neither
    pub fn set_date_time(&mut self, date: NaiveDate, time: TimeSlot) -> Result<()> {
        if !self.time_slots.contains(&time) {
            return Err(WorkflowError::TimeUnavailable(time));
        }
        self.set_date(date)?;
        self.payload.inspection_time = time;
        Ok(())
    }

    pub fn set_contact(&mut self, requested_by: RequestedBy) {
        self.payload.requested_by = Some(requested_by);
    }

    pub fn set_letter_of_intent(&mut self, reference: &str) -> Result<()> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(WorkflowError::MissingLetterOfIntent);
        }
        self.payload.letter_of_intention = Some(reference.to_string());
        Ok(())
    }

    pub fn has_letter_of_intent(&self) -> bool {
        self.payload.letter_of_intention.is_some()
    }

    pub fn set_transaction(&mut self, details: serde_json::Value) {
        self.payload.transaction = Some(details);
    }

    fn refresh_negotiating(&mut self) {
        self.payload.is_negotiating = self
            .payload
            .properties
            .iter()
            .any(|p| p.negotiation_price.is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, PropertySelection};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn property(id: &str) -> PropertySelection {
        PropertySelection {
            id: id.to_string(),
            price: 1_000_000,
            property_type: "Flat".to_string(),
            location: Location::default(),
            documents: vec![],
        }
    }

    fn offer(id: &str, price: Option<i64>) -> NegotiationEntry {
        NegotiationEntry {
            property_id: id.to_string(),
            asking_price: 1_000_000,
            proposed_price: price,
        }
    }

    #[test]
    fn test_defaults() {
        let assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        let payload = assembler.payload();
        assert_eq!(payload.inspection_date, NaiveDate::from_ymd_opt(2026, 10, 22).unwrap());
        assert_eq!(payload.inspection_time.to_string(), "9:00 AM");
        assert!(payload.properties.is_empty());
        assert!(!payload.is_negotiating);
    }

    #[test]
    fn test_offer_survives_selection_changes() {
        let mut assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        let mut selection: SelectionSet = ["a", "b"].into_iter().map(property).collect();
        assembler.sync_properties(&selection);
        assembler.merge_negotiation(&offer("a", Some(200_000)));

        selection.remove("b");
        assembler.sync_properties(&selection);
        selection.add(property("b"));
        assembler.sync_properties(&selection);

        let payload = assembler.payload();
        assert_eq!(payload.negotiation_price("a"), Some(200_000));
        assert_eq!(payload.properties.len(), 2);
        assert!(payload.is_negotiating);
    }

    #[test]
    fn test_merge_keeps_other_offers() {
        let mut assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        let selection: SelectionSet = ["a", "b"].into_iter().map(property).collect();
        assembler.sync_properties(&selection);
        assembler.merge_negotiation(&offer("a", Some(1)));
        assembler.merge_negotiation(&offer("b", Some(2)));
        assembler.merge_negotiation(&offer("b", None));

        assert_eq!(assembler.payload().negotiation_price("a"), Some(1));
        assert_eq!(assembler.payload().negotiation_price("b"), None);
        assert!(assembler.payload().is_negotiating);
    }

    #[test]
    fn test_removed_property_leaves_payload() {
        let mut assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        let mut selection: SelectionSet = ["a", "b"].into_iter().map(property).collect();
        assembler.sync_properties(&selection);
        assembler.merge_negotiation(&offer("b", Some(5)));
        selection.remove("b");
        assembler.sync_properties(&selection);

        assert_eq!(assembler.payload().properties.len(), 1);
        assert!(!assembler.payload().is_negotiating);
    }

    #[test]
    fn test_date_time_must_be_offered() {
        let mut assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        let evening = TimeSlot::at_hour(20).unwrap();
        let noon = TimeSlot::at_hour(12).unwrap();

        assert!(matches!(assembler.set_date(sunday), Err(WorkflowError::DateUnavailable(_))));
        assert!(matches!(assembler.set_time(evening), Err(WorkflowError::TimeUnavailable(_))));
        assert!(assembler.set_date_time(saturday, evening).is_err());
        assert_ne!(assembler.payload().inspection_date, saturday);

        assembler.set_date(saturday).unwrap();
        assert_eq!(assembler.payload().inspection_time.to_string(), "9:00 AM");
        assembler.set_time(noon).unwrap();
        assert_eq!(assembler.payload().inspection_date, saturday);
    }

    #[test]
    fn test_blank_letter_of_intent_rejected() {
        let mut assembler = PayloadAssembler::new(today(), &WorkflowConfig::default());
        assert!(assembler.set_letter_of_intent("  ").is_err());
        assert!(!assembler.has_letter_of_intent());
        assembler.set_letter_of_intent("https://cdn.example.com/loi.pdf").unwrap();
        assert!(assembler.has_letter_of_intent());
    }
}
