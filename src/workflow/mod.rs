pub mod assembler;
pub mod contact;
pub mod controller;
pub mod fee;
pub mod negotiation;
pub mod schedule;
pub mod selection;

pub use assembler::PayloadAssembler;
pub use contact::{ContactForm, DirectNegotiationForm};
pub use controller::{InspectionWorkflow, Step, WorkflowKind};
pub use fee::fee_of;
pub use negotiation::{NegotiationSequencer, NegotiationState, PriceInput};
pub use schedule::available_dates;
pub use selection::{AddOutcome, SelectionSet};
