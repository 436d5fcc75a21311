//! Inspection request workflow for a property marketplace: selection,
//! inspection fee, price negotiation, scheduling and the hand-off to the
//! transaction-details step.

pub mod config;
pub mod error;
pub mod handoff;
pub mod models;
pub mod workflow;

pub use config::WorkflowConfig;
pub use error::{Result, WorkflowError};
pub use workflow::{InspectionWorkflow, Step, WorkflowKind};
