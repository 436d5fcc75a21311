use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use inspection_desk::handoff::{FileTransactionStep, HttpTransactionStep};
use inspection_desk::models::{Brief, PropertySelection, TimeSlot};
use inspection_desk::workflow::{ContactForm, DirectNegotiationForm, PriceInput};
use inspection_desk::{InspectionWorkflow, Step, WorkflowConfig, WorkflowKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Inspection request as exported by the marketplace front-end
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestFile {
    briefs: Vec<Brief>,
    /// Property id -> offer as typed into the price field
    #[serde(default)]
    negotiate: BTreeMap<String, String>,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    contact: ContactForm,
    letter_of_intention: Option<String>,
    /// Negotiate straight with the seller of the first brief
    #[serde(default)]
    direct: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next() else {
        bail!("usage: inspection-desk <request.json> [config.json]");
    };
    let config = match args.next() {
        Some(path) => WorkflowConfig::load(&path).await?,
        None => WorkflowConfig::default(),
    };

    info!("🏠 Inspection Desk");
    info!("==================");

    let json = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("Failed to read {}", request_path))?;
    let request: RequestFile = serde_json::from_str(&json).context("Failed to parse request file")?;

    let kind = if request.briefs.iter().any(Brief::is_joint_venture) {
        WorkflowKind::JointVenture
    } else {
        WorkflowKind::Standard
    };
    let properties = request
        .briefs
        .iter()
        .cloned()
        .map(PropertySelection::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let today = Local::now().date_naive();

    let mut workflow = if request.direct {
        let property = properties.into_iter().next().context("Request has no briefs")?;
        let mut workflow = InspectionWorkflow::open_direct(config.clone(), today, property);
        let form = DirectNegotiationForm {
            proposed_price: request.negotiate.values().next().map(|raw| parse_amount(raw)).transpose()?,
            inspection_date: request.date.unwrap_or(workflow.payload().inspection_date),
            inspection_time: request.time.unwrap_or(config.default_time),
            contact: request.contact.clone(),
        };
        workflow.submit_direct(&form)?;
        workflow
    } else {
        run_multi_step(InspectionWorkflow::open(config.clone(), kind, today, properties), &request)?
    };

    if workflow.step() != Step::TransactionDetails {
        bail!("Workflow stopped at {} before reaching transaction details", workflow.step());
    }

    let receipt = match &config.transaction_endpoint {
        Some(endpoint) => {
            let step = HttpTransactionStep::new(endpoint.clone(), &config)?;
            workflow.hand_off(&step).await?
        }
        None => workflow.hand_off(&FileTransactionStep::new("outbox")).await?,
    };

    println!("Reference: {}", receipt.reference);
    println!("Sent to:   {}", receipt.destination);
    println!("{}", serde_json::to_string_pretty(workflow.payload())?);

    Ok(())
}

fn run_multi_step(mut workflow: InspectionWorkflow, request: &RequestFile) -> Result<InspectionWorkflow> {
    let Some(fee) = workflow.fee() else {
        bail!("Nothing selected for inspection");
    };
    info!("Inspection fee: {}", fee.formatted(&workflow.config().currency_symbol));

    if let Some(reference) = &request.letter_of_intention {
        workflow.open_letter_of_intent()?;
        workflow.submit_letter_of_intent(reference)?;
    }

    for (property_id, raw) in &request.negotiate {
        workflow.open_negotiation(property_id)?;
        // The sequencer walks every property from this one on; only the
        // first is the one we have an offer for.
        if let PriceInput::Rejected { warning } = workflow.enter_price(raw)? {
            warn!(property_id = %property_id, "{}", warning);
        }
        workflow.submit_negotiation()?;
        if workflow.step() == Step::Negotiation {
            workflow.cancel_negotiation()?;
        }
    }

    workflow.proceed()?;
    if let Some(date) = request.date {
        workflow.select_date(date)?;
    }
    if let Some(time) = request.time {
        workflow.select_time(time)?;
    }
    workflow.confirm_schedule()?;
    workflow.submit_contact(&request.contact)?;

    Ok(workflow)
}

fn parse_amount(raw: &str) -> Result<i64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned
        .parse()
        .with_context(|| format!("Invalid amount {:?}", raw))
}
