use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, info, warn};

use super::assembler::PayloadAssembler;
use super::contact::{ContactForm, DirectNegotiationForm};
use super::fee::fee_of;
use super::negotiation::{NegotiationSequencer, PriceInput};
use super::selection::{AddOutcome, SelectionSet};
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::handoff::{TransactionReceipt, TransactionStep};
use crate::models::{InspectionFeeQuote, PropertySelection, SubmissionPayload, TimeSlot};

/// Which flavour of request is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Standard,
    /// Joint venture: a letter of intention replaces price negotiation
    JointVenture,
}

/// The one step the workflow is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Selection,
    Negotiation,
    LetterOfIntent,
    Schedule,
    Contact,
    DirectNegotiation,
    TransactionDetails,
    Submitted,
    Closed,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted | Self::Closed)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Drives one inspection request from selection to hand-off
#[derive(Debug, Clone)]
pub struct InspectionWorkflow {
    config: WorkflowConfig,
    kind: WorkflowKind,
    step: Step,
    /// Entered from a listing page rather than the multi-select flow
    direct: bool,
    selection: SelectionSet,
    negotiation: NegotiationSequencer,
    assembler: PayloadAssembler,
}

impl InspectionWorkflow {
    /// Open the multi-step flow on a selection. An empty selection closes it straight away.
    pub fn open(
        config: WorkflowConfig,
        kind: WorkflowKind,
        today: NaiveDate,
        properties: impl IntoIterator<Item = PropertySelection>,
    ) -> Self {
        let assembler = PayloadAssembler::new(today, &config);
        let mut workflow = Self {
            config,
            kind,
            step: Step::Selection,
            direct: false,
            selection: properties.into_iter().collect(),
            negotiation: NegotiationSequencer::new(),
            assembler,
        };
        info!(kind = ?kind, properties = workflow.selection.len(), "Opened inspection workflow");
        workflow.selection_changed();
        workflow
    }

    /// Open the single-form flow for negotiating on one listing with its seller
    pub fn open_direct(config: WorkflowConfig, today: NaiveDate, property: PropertySelection) -> Self {
        let assembler = PayloadAssembler::new(today, &config);
        let mut workflow = Self {
            config,
            kind: WorkflowKind::Standard,
            step: Step::DirectNegotiation,
            direct: true,
            selection: SelectionSet::new(),
            negotiation: NegotiationSequencer::new(),
            assembler,
        };
        info!(property_id = %property.id, "Opened direct negotiation");
        workflow.selection.add(property);
        workflow.assembler.sync_properties(&workflow.selection);
        workflow
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn negotiation(&self) -> &NegotiationSequencer {
        &self.negotiation
    }

    pub fn payload(&self) -> &SubmissionPayload {
        self.assembler.payload()
    }

    pub fn available_dates(&self) -> &[NaiveDate] {
        self.assembler.available_dates()
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        self.assembler.time_slots()
    }

    pub fn fee(&self) -> Option<InspectionFeeQuote> {
        fee_of(self.selection.as_slice(), &self.config)
    }

    fn require(&self, expected: Step, action: &'static str) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        debug!(step = %self.step, action, "Rejected transition");
        WorkflowError::InvalidTransition { from: self.step, action }
    }

    fn move_to(&mut self, next: Step) {
        debug!(from = %self.step, to = %next, "Step transition");
        self.step = next;
    }

    fn selection_changed(&mut self) {
        self.assembler.sync_properties(&self.selection);
        if self.fee().is_none() && !self.step.is_terminal() {
            info!("Selection is empty, closing inspection workflow");
            self.move_to(Step::Closed);
        }
    }

    // Selection

    pub fn add_property(&mut self, property: PropertySelection) -> Result<AddOutcome> {
        self.require(Step::Selection, "add a property")?;
        let outcome = self.selection.add(property);
        self.selection_changed();
        Ok(outcome)
    }

    pub fn remove_property(&mut self, property_id: &str) -> Result<()> {
        self.require(Step::Selection, "remove a property")?;
        self.selection.remove(property_id);
        self.selection_changed();
        Ok(())
    }

    pub fn replace_selection(&mut self, properties: impl IntoIterator<Item = PropertySelection>) -> Result<()> {
        self.require(Step::Selection, "replace the selection")?;
        self.selection.replace(properties);
        self.selection_changed();
        Ok(())
    }

    // Negotiation

    pub fn open_negotiation(&mut self, property_id: &str) -> Result<()> {
        self.require(Step::Selection, "open negotiation")?;
        if self.kind == WorkflowKind::JointVenture {
            return Err(self.invalid("negotiate on a joint venture"));
        }

        let payload = self.assembler.payload();
        self.negotiation
            .open(&self.selection, property_id, |id| payload.negotiation_price(id))?;
        self.move_to(Step::Negotiation);
        Ok(())
    }

    /// Price-negotiation shortcut from a property card: negotiate on this one property only
    pub fn negotiate_only(&mut self, property: PropertySelection) -> Result<()> {
        self.require(Step::Selection, "open negotiation")?;
        if self.kind == WorkflowKind::JointVenture {
            return Err(self.invalid("negotiate on a joint venture"));
        }
        let property_id = property.id.clone();
        self.replace_selection([property])?;
        self.open_negotiation(&property_id)
    }

    pub fn enter_price(&mut self, raw: &str) -> Result<PriceInput> {
        self.require(Step::Negotiation, "enter a price")?;
        Ok(self.negotiation.enter_price(raw))
    }

    /// Record the current property's offer; closes negotiation after the last property
    pub fn submit_negotiation(&mut self) -> Result<()> {
        self.require(Step::Negotiation, "submit negotiation")?;
        let entry = self.negotiation.submit()?;
        self.assembler.merge_negotiation(&entry);

        if !self.negotiation.is_active() {
            info!(negotiating = self.payload().is_negotiating, "Negotiation finished");
            self.move_to(Step::Selection);
        }
        Ok(())
    }

    pub fn cancel_negotiation(&mut self) -> Result<()> {
        self.require(Step::Negotiation, "cancel negotiation")?;
        self.negotiation.cancel();
        self.move_to(Step::Selection);
        Ok(())
    }

    // Letter of intention

    pub fn open_letter_of_intent(&mut self) -> Result<()> {
        self.require(Step::Selection, "open letter of intention")?;
        if self.kind != WorkflowKind::JointVenture {
            return Err(self.invalid("attach a letter of intention"));
        }
        self.move_to(Step::LetterOfIntent);
        Ok(())
    }

    /// Attach the uploaded document; a blank reference keeps the step open
    pub fn submit_letter_of_intent(&mut self, reference: &str) -> Result<()> {
        self.require(Step::LetterOfIntent, "submit letter of intention")?;
        self.assembler.set_letter_of_intent(reference)?;
        info!("Letter of intention attached");
        self.move_to(Step::Selection);
        Ok(())
    }

    pub fn cancel_letter_of_intent(&mut self) -> Result<()> {
        self.require(Step::LetterOfIntent, "cancel letter of intention")?;
        self.move_to(Step::Selection);
        Ok(())
    }

    // Schedule and contact

    pub fn proceed(&mut self) -> Result<()> {
        self.require(Step::Selection, "proceed")?;
        if self.selection.is_empty() {
            return Err(WorkflowError::EmptySelection);
        }
        if self.kind == WorkflowKind::JointVenture && !self.assembler.has_letter_of_intent() {
            warn!("Joint venture request has no letter of intention");
            return Err(WorkflowError::MissingLetterOfIntent);
        }

        self.assembler.sync_properties(&self.selection);
        if let Some(fee) = self.fee() {
            info!(fee = %fee.formatted(&self.config.currency_symbol), "Proceeding to schedule");
        }
        self.move_to(Step::Schedule);
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<()> {
        self.require(Step::Schedule, "select a date")?;
        self.assembler.set_date(date)
    }

    pub fn select_time(&mut self, time: TimeSlot) -> Result<()> {
        self.require(Step::Schedule, "select a time")?;
        self.assembler.set_time(time)
    }

    pub fn confirm_schedule(&mut self) -> Result<()> {
        self.require(Step::Schedule, "confirm schedule")?;
        let payload = self.assembler.payload();
        if !self.assembler.available_dates().contains(&payload.inspection_date) {
            warn!(date = %payload.inspection_date, "No bookable inspection date");
            return Err(WorkflowError::DateUnavailable(payload.inspection_date));
        }
        info!(date = %payload.inspection_date, time = %payload.inspection_time, "Inspection slot chosen");
        self.move_to(Step::Contact);
        Ok(())
    }

    pub fn submit_contact(&mut self, form: &ContactForm) -> Result<()> {
        self.require(Step::Contact, "submit contact details")?;
        let requested_by = form.validated()?;
        self.assembler.set_contact(requested_by);
        self.move_to(Step::TransactionDetails);
        Ok(())
    }

    /// Offer, slot and contact in one form; nothing is recorded unless all of it is valid
    pub fn submit_direct(&mut self, form: &DirectNegotiationForm) -> Result<()> {
        self.require(Step::DirectNegotiation, "submit direct negotiation")?;
        let requested_by = form.contact.validated()?;

        let property_id = self
            .selection
            .iter()
            .next()
            .map(|p| p.id.clone())
            .ok_or(WorkflowError::EmptySelection)?;
        if !self.negotiation.is_active() {
            let payload = self.assembler.payload();
            self.negotiation
                .open(&self.selection, &property_id, |id| payload.negotiation_price(id))?;
        }
        self.negotiation.set_price(form.proposed_price)?;
        self.assembler.set_date_time(form.inspection_date, form.inspection_time)?;

        let entry = self.negotiation.submit()?;
        self.assembler.merge_negotiation(&entry);
        self.assembler.set_contact(requested_by);
        self.move_to(Step::TransactionDetails);
        Ok(())
    }

    // Hand-off

    /// Fields added by the transaction-details step (bank, receipt reference, ...)
    pub fn attach_transaction(&mut self, details: serde_json::Value) -> Result<()> {
        self.require(Step::TransactionDetails, "attach transaction details")?;
        self.assembler.set_transaction(details);
        Ok(())
    }

    pub async fn hand_off<T>(&mut self, step: &T) -> Result<TransactionReceipt>
    where
        T: TransactionStep + ?Sized,
    {
        self.require(Step::TransactionDetails, "hand off")?;
        info!(to = step.step_name(), properties = self.payload().properties.len(), "Handing off inspection request");

        let receipt = step
            .submit(self.assembler.payload())
            .await
            .map_err(WorkflowError::Handoff)?;
        info!(reference = %receipt.reference, "Inspection request submitted");
        self.move_to(Step::Submitted);
        Ok(receipt)
    }

    // Navigation

    /// Return to the previous step, discarding the current step's unsaved input
    pub fn back(&mut self) -> Result<()> {
        let previous = match self.step {
            Step::Negotiation => {
                self.negotiation.cancel();
                Step::Selection
            }
            Step::LetterOfIntent | Step::Schedule => Step::Selection,
            Step::Contact => Step::Schedule,
            Step::TransactionDetails if self.direct => Step::DirectNegotiation,
            Step::TransactionDetails => Step::Contact,
            Step::DirectNegotiation => Step::Closed,
            Step::Selection | Step::Submitted | Step::Closed => return Err(self.invalid("go back")),
        };
        self.move_to(previous);
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if self.step.is_terminal() {
            return Err(self.invalid("close"));
        }
        if self.negotiation.is_active() {
            self.negotiation.cancel();
        }
        info!(step = %self.step, "Inspection workflow closed");
        self.move_to(Step::Closed);
        Ok(())
    }
}
