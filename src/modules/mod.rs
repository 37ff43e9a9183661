//! The dashboard modules and the pipeline they share.
//!
//! Every module submission runs the same steps:
//!
//! 1. read its field(s) from the [`FormInput`]
//! 2. put its [`Panel`] into the loading state
//! 3. POST the typed request to the module's endpoint
//! 4. decode the body into the module's typed response and turn it into a
//!    [`DisplayMap`] (or a rejection)
//! 5. render the result, or `"{module} failed: {reason}"` on any failure
//!
//! What differs per module is data: an endpoint, a field reader and a
//! response transform, captured by the [`Module`] trait. [`ModuleKind`]
//! selects a module at runtime.

pub mod compliance;
pub mod fields;
pub mod generator;
pub mod market;
pub mod personalization;
pub mod prediction;
pub mod pricing;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{ApiError, Transport};
use crate::render::{DisplayMap, Panel};

pub use compliance::Compliance;
pub use generator::{LeadScore, MarketingCampaign, SalesPitch};
pub use market::{Benchmark, Sentiment};
pub use personalization::Personalization;
pub use prediction::Prediction;
pub use pricing::Pricing;

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Current values of the dashboard's input fields, keyed by element id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    fields: HashMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(id.into(), value.into());
    }

    /// Value of a field. Unknown ids read as empty text.
    pub fn value(&self, id: &str) -> &str {
        self.fields.get(id).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Module trait and pipeline
// ---------------------------------------------------------------------------

/// Result of a module's response transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Render as a success mapping.
    Display(DisplayMap),
    /// The backend reported an application error inside a successful
    /// response; render the message as an error.
    Rejected(String),
}

/// One dashboard module, described as data for the shared pipeline.
pub trait Module {
    /// Human name used as the failure prefix (`"{NAME} failed: ..."`).
    const NAME: &'static str;
    /// Endpoint path below the API root.
    const ENDPOINT: &'static str;
    /// Element id of the result panel.
    const PANEL_ID: &'static str;

    type Request: Serialize;
    type Response: DeserializeOwned;

    /// Build the request payload from the form.
    fn read(form: &FormInput) -> Self::Request;

    /// Turn a decoded response into what the panel shows.
    fn present(response: Self::Response) -> Outcome;
}

/// Why a submission ended in an error panel.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(serde_json::Error),
}

/// How a submission ended.
#[derive(Debug)]
pub enum SubmitStatus {
    /// A success mapping is on the panel.
    Rendered,
    /// The backend's own error message is on the panel.
    Rejected(String),
    /// The call or decode failed; the prefixed message is on the panel.
    Failed(SubmitError),
}

impl SubmitStatus {
    /// Short label for activity logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rendered => "ok",
            Self::Rejected(_) => "rejected",
            Self::Failed(_) => "failed",
        }
    }

    /// Error text, if the submission did not render a result.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Rendered => None,
            Self::Rejected(msg) => Some(msg.clone()),
            Self::Failed(err) => Some(err.to_string()),
        }
    }
}

/// Run one submission of module `M` against `transport`, rendering into
/// `panel`. Never fails: every error ends up on the panel.
pub fn submit<M: Module>(transport: &dyn Transport, form: &FormInput, panel: &mut Panel) -> SubmitStatus {
    panel.show_loading();

    match call::<M>(transport, form) {
        Ok(Outcome::Display(map)) => {
            panel.show_result(map);
            SubmitStatus::Rendered
        }
        Ok(Outcome::Rejected(message)) => {
            panel.show_error(message.clone());
            SubmitStatus::Rejected(message)
        }
        Err(err) => {
            panel.show_error(format!("{} failed: {err}", M::NAME));
            SubmitStatus::Failed(err)
        }
    }
}

fn call<M: Module>(transport: &dyn Transport, form: &FormInput) -> Result<Outcome, SubmitError> {
    let payload = serde_json::to_value(M::read(form)).map_err(SubmitError::Encode)?;
    let body = transport.post_json(M::ENDPOINT, &payload)?;
    let response: M::Response =
        serde_json::from_value(body).map_err(SubmitError::UnexpectedResponse)?;
    Ok(M::present(response))
}

// ---------------------------------------------------------------------------
// Runtime selection
// ---------------------------------------------------------------------------

/// The six analysis modules plus the three generator hub modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Sentiment,
    Benchmark,
    Pricing,
    Compliance,
    Prediction,
    Personalization,
    MarketingCampaign,
    SalesPitch,
    LeadScore,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 9] = [
        Self::Sentiment,
        Self::Benchmark,
        Self::Pricing,
        Self::Compliance,
        Self::Prediction,
        Self::Personalization,
        Self::MarketingCampaign,
        Self::SalesPitch,
        Self::LeadScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sentiment => Sentiment::NAME,
            Self::Benchmark => Benchmark::NAME,
            Self::Pricing => Pricing::NAME,
            Self::Compliance => Compliance::NAME,
            Self::Prediction => Prediction::NAME,
            Self::Personalization => Personalization::NAME,
            Self::MarketingCampaign => MarketingCampaign::NAME,
            Self::SalesPitch => SalesPitch::NAME,
            Self::LeadScore => LeadScore::NAME,
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Sentiment => Sentiment::ENDPOINT,
            Self::Benchmark => Benchmark::ENDPOINT,
            Self::Pricing => Pricing::ENDPOINT,
            Self::Compliance => Compliance::ENDPOINT,
            Self::Prediction => Prediction::ENDPOINT,
            Self::Personalization => Personalization::ENDPOINT,
            Self::MarketingCampaign => MarketingCampaign::ENDPOINT,
            Self::SalesPitch => SalesPitch::ENDPOINT,
            Self::LeadScore => LeadScore::ENDPOINT,
        }
    }

    pub fn panel_id(self) -> &'static str {
        match self {
            Self::Sentiment => Sentiment::PANEL_ID,
            Self::Benchmark => Benchmark::PANEL_ID,
            Self::Pricing => Pricing::PANEL_ID,
            Self::Compliance => Compliance::PANEL_ID,
            Self::Prediction => Prediction::PANEL_ID,
            Self::Personalization => Personalization::PANEL_ID,
            Self::MarketingCampaign => MarketingCampaign::PANEL_ID,
            Self::SalesPitch => SalesPitch::PANEL_ID,
            Self::LeadScore => LeadScore::PANEL_ID,
        }
    }

    /// Input fields as `(element id, prompt label)`.
    pub fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Sentiment => &[(market::SENTIMENT_INPUT, "Customer feedback")],
            Self::Benchmark => &[(market::BENCHMARK_INPUT, "Brand")],
            Self::Pricing => &[
                (pricing::COST_INPUT, "Unit cost"),
                (pricing::DEMAND_INPUT, "Demand index (0.5-1.5)"),
                (pricing::COMPETITOR_INPUT, "Competitor price"),
            ],
            Self::Compliance => &[(compliance::COMPLIANCE_INPUT, "Marketing text")],
            Self::Prediction => &[(prediction::PREDICTION_INPUT, "Customer history")],
            Self::Personalization => &[(personalization::PERSONALIZATION_INPUT, "User profile")],
            Self::MarketingCampaign => &[
                (generator::PRODUCT_DETAILS_INPUT, "Product details"),
                (generator::DEMOGRAPHICS_INPUT, "LinkedIn demographics"),
            ],
            Self::SalesPitch => &[
                (generator::PROSPECT_TITLE_INPUT, "Prospect title"),
                (generator::COMPANY_TIER_INPUT, "Company tier"),
                (generator::PRODUCT_INFO_INPUT, "Product info (optional)"),
            ],
            Self::LeadScore => &[
                (generator::BUDGET_INPUT, "Budget"),
                (generator::TIMELINE_INPUT, "Timeline"),
                (generator::URGENCY_INPUT, "Urgency"),
                (generator::CONTEXT_INPUT, "Additional context (optional)"),
            ],
        }
    }

    /// A representative form used by `growthdash status` to exercise endpoints.
    pub fn sample_form(self) -> FormInput {
        let values: &[&str] = match self {
            Self::Sentiment => &["The onboarding was smooth and support answered fast."],
            Self::Benchmark => &["Acme Analytics"],
            Self::Pricing => &["40", "1.1", "59.99"],
            Self::Compliance => &["Guaranteed results! Sign up now and we'll share your data with partners."],
            Self::Prediction => &["Purchased monthly for 2 years, no orders in the last 60 days."],
            Self::Personalization => &["Marketing manager at a 50-person SaaS company, interested in automation."],
            Self::MarketingCampaign => &[
                "AI email platform with subject line optimization, $99-$499/month.",
                "Marketing directors at B2B SaaS companies with 250-1000 employees.",
            ],
            Self::SalesPitch => &["VP of Sales", "Mid-Market (250-1000 employees)", "Sales intelligence platform"],
            Self::LeadScore => &["$250000", "This Quarter", "Critical/High", "Series B funded startup"],
        };

        self.fields()
            .iter()
            .zip(values)
            .fold(FormInput::new(), |form, ((id, _), value)| form.with(*id, *value))
    }

    /// A fresh, hidden panel for this module.
    pub fn panel(self) -> Panel {
        Panel::new(self.panel_id())
    }

    /// Run the shared pipeline for this module.
    pub fn submit(self, transport: &dyn Transport, form: &FormInput, panel: &mut Panel) -> SubmitStatus {
        match self {
            Self::Sentiment => submit::<Sentiment>(transport, form, panel),
            Self::Benchmark => submit::<Benchmark>(transport, form, panel),
            Self::Pricing => submit::<Pricing>(transport, form, panel),
            Self::Compliance => submit::<Compliance>(transport, form, panel),
            Self::Prediction => submit::<Prediction>(transport, form, panel),
            Self::Personalization => submit::<Personalization>(transport, form, panel),
            Self::MarketingCampaign => submit::<MarketingCampaign>(transport, form, panel),
            Self::SalesPitch => submit::<SalesPitch>(transport, form, panel),
            Self::LeadScore => submit::<LeadScore>(transport, form, panel),
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
