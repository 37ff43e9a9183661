//! Compliance and risk monitoring for marketing copy.

use serde::{Deserialize, Serialize};

use super::fields;
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

pub struct Compliance;

pub const COMPLIANCE_INPUT: &str = "compliance-input";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceRequest {
    pub marketing_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComplianceResponse {
    /// `high`, `medium` or `low`.
    #[serde(default, deserialize_with = "fields::text")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "fields::truthy")]
    pub gdpr_compliant: bool,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub flagged_phrases: Vec<String>,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub suggestions: Vec<String>,
}

impl Module for Compliance {
    const NAME: &'static str = "Compliance check";
    const ENDPOINT: &'static str = endpoints::COMPLIANCE;
    const PANEL_ID: &'static str = "compliance-result";

    type Request = ComplianceRequest;
    type Response = ComplianceResponse;

    fn read(form: &FormInput) -> ComplianceRequest {
        ComplianceRequest {
            marketing_text: form.value(COMPLIANCE_INPUT).to_string(),
        }
    }

    fn present(response: ComplianceResponse) -> Outcome {
        let indicator = fields::level_indicator(response.risk_level.as_deref());
        let risk = fields::upper_or(response.risk_level, "UNKNOWN");

        let gdpr = if response.gdpr_compliant {
            "✓ Yes"
        } else {
            "✗ No"
        };

        let flagged = fields::join_or(&response.flagged_phrases, ", ", "None");
        let suggestions =
            fields::join_or(&response.suggestions, "; ", "Your text looks compliant!");

        Outcome::Display(
            DisplayMap::new()
                .with("Risk Level", format!("{indicator} {risk}"))
                .with("GDPR Compliant", gdpr)
                .with("Flagged Phrases", flagged)
                .with("Suggestions", suggestions),
        )
    }
}
