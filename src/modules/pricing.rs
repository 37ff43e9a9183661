//! Smart pricing engine: optimal price from cost, demand and competitor price.

use serde::{Deserialize, Serialize};

use super::fields::{self, NOT_AVAILABLE};
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

pub struct Pricing;

pub const COST_INPUT: &str = "cost-input";
pub const DEMAND_INPUT: &str = "demand-input";
pub const COMPETITOR_INPUT: &str = "competitor-input";

/// Numbers are sent unvalidated. A field that doesn't parse is `NaN`, which
/// serializes as JSON `null`; the backend decides what to do with it.
#[derive(Debug, Clone, Serialize)]
pub struct PricingRequest {
    pub cost: f64,
    pub demand_index: f64,
    pub competitor_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PricingResponse {
    #[serde(default, deserialize_with = "fields::text")]
    pub optimal_price: Option<String>,
    /// Already a percentage (0–100).
    #[serde(default, deserialize_with = "fields::text")]
    pub margin_percent: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub pricing_reason: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub competitor_analysis: Option<String>,
    /// Application-level failure reported with a success status.
    #[serde(default, deserialize_with = "fields::text")]
    pub error: Option<String>,
}

impl Module for Pricing {
    const NAME: &'static str = "Pricing optimization";
    const ENDPOINT: &'static str = endpoints::PRICING;
    const PANEL_ID: &'static str = "pricing-result";

    type Request = PricingRequest;
    type Response = PricingResponse;

    fn read(form: &FormInput) -> PricingRequest {
        PricingRequest {
            cost: fields::parse_float(form.value(COST_INPUT)),
            demand_index: fields::parse_float(form.value(DEMAND_INPUT)),
            competitor_price: fields::parse_float(form.value(COMPETITOR_INPUT)),
        }
    }

    fn present(response: PricingResponse) -> Outcome {
        if let Some(error) = response.error {
            return Outcome::Rejected(error);
        }

        let price = response.optimal_price.as_deref().unwrap_or("0");

        Outcome::Display(
            DisplayMap::new()
                .with("Optimal Price", format!("${price}"))
                .with("Margin", fields::direct_percent(response.margin_percent))
                .with(
                    "Recommendation",
                    fields::or_fallback(response.pricing_reason, NOT_AVAILABLE),
                )
                .with(
                    "Competitor Analysis",
                    fields::or_fallback(response.competitor_analysis, NOT_AVAILABLE),
                ),
        )
    }
}
