//! Predictive analytics: churn risk and next best action.

use serde::{Deserialize, Serialize};

use super::fields::{self, NOT_AVAILABLE};
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

pub struct Prediction;

pub const PREDICTION_INPUT: &str = "prediction-input";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub history_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, deserialize_with = "fields::text")]
    pub churn_risk: Option<String>,
    /// Already a percentage (0–100).
    #[serde(default, deserialize_with = "fields::text")]
    pub churn_probability: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub next_best_action: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub campaign_timing: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub recommended_channel: Option<String>,
}

impl Module for Prediction {
    const NAME: &'static str = "Prediction";
    const ENDPOINT: &'static str = endpoints::PREDICTION;
    const PANEL_ID: &'static str = "prediction-result";

    type Request = PredictionRequest;
    type Response = PredictionResponse;

    fn read(form: &FormInput) -> PredictionRequest {
        PredictionRequest {
            history_data: form.value(PREDICTION_INPUT).to_string(),
        }
    }

    fn present(response: PredictionResponse) -> Outcome {
        let indicator = fields::level_indicator(response.churn_risk.as_deref());
        let risk = fields::upper_or(response.churn_risk, "UNKNOWN");

        Outcome::Display(
            DisplayMap::new()
                .with("Churn Risk", format!("{indicator} {risk}"))
                .with(
                    "Churn Probability",
                    fields::direct_percent(response.churn_probability),
                )
                .with(
                    "Next Best Action",
                    fields::or_fallback(response.next_best_action, NOT_AVAILABLE),
                )
                .with(
                    "Campaign Timing",
                    fields::or_fallback(response.campaign_timing, NOT_AVAILABLE),
                )
                .with(
                    "Recommended Channel",
                    fields::or_fallback(response.recommended_channel, NOT_AVAILABLE),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn display(body: serde_json::Value) -> DisplayMap {
        match Prediction::present(serde_json::from_value(body).unwrap()) {
            Outcome::Display(map) => map,
            Outcome::Rejected(msg) => panic!("unexpected rejection: {msg}"),
        }
    }

    #[test]
    fn formats_churn_fields() {
        let map = display(json!({
            "churn_risk": "medium",
            "churn_probability": 42,
            "next_best_action": "Offer loyalty discount",
            "campaign_timing": "Within 7 days",
            "recommended_channel": "Email"
        }));
        assert_eq!(map.get("Churn Risk"), Some("🟡 MEDIUM"));
        assert_eq!(map.get("Churn Probability"), Some("42%"));
        assert_eq!(map.get("Next Best Action"), Some("Offer loyalty discount"));
        assert_eq!(map.get("Campaign Timing"), Some("Within 7 days"));
        assert_eq!(map.get("Recommended Channel"), Some("Email"));
    }

    #[test]
    fn probability_is_not_rescaled() {
        let map = display(json!({ "churn_risk": "high", "churn_probability": 0.8 }));
        assert_eq!(map.get("Churn Risk"), Some("🔴 HIGH"));
        assert_eq!(map.get("Churn Probability"), Some("0.8%"));
    }

    #[test]
    fn missing_fields_fall_back() {
        let map = display(json!({}));
        assert_eq!(map.get("Churn Risk"), Some("🟢 UNKNOWN"));
        assert_eq!(map.get("Churn Probability"), Some("0%"));
        assert_eq!(map.get("Recommended Channel"), Some("N/A"));
    }
}
