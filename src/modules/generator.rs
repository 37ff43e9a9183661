//! Generator hub: campaign strategy, sales pitch and lead scoring.
//!
//! All three endpoints answer with the same envelope, `{"result": ...}` on
//! success and `{"error": "..."}` otherwise. The `result` is model output:
//! usually an object of the documented shape, sometimes an object carrying
//! its own `error` (the backend could not parse the model's answer), and
//! occasionally a bare string.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{self, NOT_AVAILABLE};
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

pub const PRODUCT_DETAILS_INPUT: &str = "campaign-product-input";
pub const DEMOGRAPHICS_INPUT: &str = "campaign-audience-input";

pub const PROSPECT_TITLE_INPUT: &str = "pitch-title-input";
pub const COMPANY_TIER_INPUT: &str = "pitch-tier-input";
pub const PRODUCT_INFO_INPUT: &str = "pitch-product-input";

pub const BUDGET_INPUT: &str = "lead-budget-input";
pub const TIMELINE_INPUT: &str = "lead-timeline-input";
pub const URGENCY_INPUT: &str = "lead-urgency-input";
pub const CONTEXT_INPUT: &str = "lead-context-input";

/// Label of the single row shown for a plain-text result.
pub const RESULT_LABEL: &str = "Result";

// ---------------------------------------------------------------------------
// Shared envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratorResponse {
    #[serde(default, deserialize_with = "fields::text")]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

/// Unwrap the envelope into a typed result, or the outcome to show instead.
fn open<T: DeserializeOwned + Default>(response: GeneratorResponse) -> Result<T, Outcome> {
    if let Some(error) = response.error {
        return Err(Outcome::Rejected(error));
    }

    match response.result {
        Some(Value::String(raw)) => Err(Outcome::Display(DisplayMap::new().with(RESULT_LABEL, raw))),
        Some(Value::Object(object)) => {
            if let Some(error) = object.get("error").and_then(Value::as_str)
                && !error.is_empty()
            {
                return Err(Outcome::Rejected(error.to_string()));
            }
            Ok(serde_json::from_value(Value::Object(object)).unwrap_or_default())
        }
        _ => Ok(T::default()),
    }
}

/// `main (tag)`, or just `main` without a tag.
fn tagged(main: Option<String>, tag: Option<String>) -> String {
    let main = fields::or_fallback(main, NOT_AVAILABLE);
    match tag {
        Some(tag) => format!("{main} ({tag})"),
        None => main,
    }
}

// ---------------------------------------------------------------------------
// Marketing campaign strategist
// ---------------------------------------------------------------------------

pub struct MarketingCampaign;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRequest {
    pub product_details: String,
    pub linkedin_demographics: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CampaignPlan {
    #[serde(default, deserialize_with = "fields::text_list")]
    pub campaign_objectives: Vec<String>,
    #[serde(default, deserialize_with = "fields::record_list")]
    pub content_ideas: Option<Vec<ContentIdea>>,
    #[serde(default, deserialize_with = "fields::record_list")]
    pub ad_copy_variations: Option<Vec<AdCopy>>,
    #[serde(default, deserialize_with = "fields::record")]
    pub platform_specific_ctas: PlatformCtas,
    #[serde(default, deserialize_with = "fields::text")]
    pub campaign_timeline: Option<String>,
    #[serde(default, deserialize_with = "fields::record")]
    pub expected_kpis: ExpectedKpis,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentIdea {
    #[serde(default, deserialize_with = "fields::text")]
    pub title: Option<String>,
    /// Article, case study, infographic, ...
    #[serde(default, deserialize_with = "fields::text")]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub key_message: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub engagement_angle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdCopy {
    #[serde(default, deserialize_with = "fields::text")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlatformCtas {
    #[serde(default, deserialize_with = "fields::text")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub web: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpectedKpis {
    #[serde(default, deserialize_with = "fields::text")]
    pub click_through_rate: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub conversion_rate: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub lead_quality_score: Option<String>,
}

impl Module for MarketingCampaign {
    const NAME: &'static str = "Marketing campaign";
    const ENDPOINT: &'static str = endpoints::MARKETING_CAMPAIGN;
    const PANEL_ID: &'static str = "campaign-result";

    type Request = CampaignRequest;
    type Response = GeneratorResponse;

    fn read(form: &FormInput) -> CampaignRequest {
        CampaignRequest {
            product_details: form.value(PRODUCT_DETAILS_INPUT).to_string(),
            linkedin_demographics: form.value(DEMOGRAPHICS_INPUT).to_string(),
        }
    }

    fn present(response: GeneratorResponse) -> Outcome {
        let plan: CampaignPlan = match open(response) {
            Ok(plan) => plan,
            Err(outcome) => return outcome,
        };
        let mut map = DisplayMap::new();

        for (index, objective) in plan.campaign_objectives.into_iter().enumerate() {
            map.push(format!("Objective {}", index + 1), objective);
        }

        for (index, idea) in plan.content_ideas.unwrap_or_default().into_iter().enumerate() {
            map.push(format!("Idea {}", index + 1), tagged(idea.title, idea.format));
            map.push("  Message", fields::or_fallback(idea.key_message, NOT_AVAILABLE));
            map.push("  Angle", fields::or_fallback(idea.engagement_angle, NOT_AVAILABLE));
        }

        for (index, ad) in plan.ad_copy_variations.unwrap_or_default().into_iter().enumerate() {
            let tone = ad.tone.map(|t| t.to_uppercase());
            map.push(format!("Ad {}", index + 1), tagged(ad.headline, tone));
            map.push("  Body", fields::or_fallback(ad.body, NOT_AVAILABLE));
        }

        let ctas = plan.platform_specific_ctas;
        let kpis = plan.expected_kpis;
        Outcome::Display(
            map.with("LinkedIn CTA", fields::or_fallback(ctas.linkedin, NOT_AVAILABLE))
                .with("Email CTA", fields::or_fallback(ctas.email, NOT_AVAILABLE))
                .with("Web CTA", fields::or_fallback(ctas.web, NOT_AVAILABLE))
                .with("Timeline", fields::or_fallback(plan.campaign_timeline, NOT_AVAILABLE))
                .with(
                    "Click-through Rate",
                    fields::or_fallback(kpis.click_through_rate, NOT_AVAILABLE),
                )
                .with(
                    "Conversion Rate",
                    fields::or_fallback(kpis.conversion_rate, NOT_AVAILABLE),
                )
                .with(
                    "Lead Quality",
                    fields::or_fallback(kpis.lead_quality_score, NOT_AVAILABLE),
                ),
        )
    }
}

// ---------------------------------------------------------------------------
// B2B sales pitch architect
// ---------------------------------------------------------------------------

pub struct SalesPitch;

/// `product_info` is optional on the backend; an empty string means none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPitchRequest {
    pub prospect_title: String,
    pub company_tier: String,
    pub product_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PitchPlan {
    #[serde(default, deserialize_with = "fields::text")]
    pub elevator_pitch_30sec: Option<String>,
    #[serde(default, deserialize_with = "fields::record")]
    pub pain_point_analysis: PainPoints,
    #[serde(default, deserialize_with = "fields::record_list")]
    pub differentiators: Option<Vec<Differentiator>>,
    #[serde(default, deserialize_with = "fields::record")]
    pub strategic_cta: StrategicCta,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub discovery_questions: Vec<String>,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub social_proof_angles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PainPoints {
    #[serde(default, deserialize_with = "fields::text")]
    pub primary_pain: Option<String>,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub secondary_pains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Differentiator {
    #[serde(default, deserialize_with = "fields::text")]
    pub differentiator: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub benefits_for_role: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrategicCta {
    #[serde(default, deserialize_with = "fields::text")]
    pub immediate_next_step: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub suggested_angle: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub objection_handler: Option<String>,
}

impl Module for SalesPitch {
    const NAME: &'static str = "Sales pitch";
    const ENDPOINT: &'static str = endpoints::SALES_PITCH;
    const PANEL_ID: &'static str = "pitch-result";

    type Request = SalesPitchRequest;
    type Response = GeneratorResponse;

    fn read(form: &FormInput) -> SalesPitchRequest {
        SalesPitchRequest {
            prospect_title: form.value(PROSPECT_TITLE_INPUT).to_string(),
            company_tier: form.value(COMPANY_TIER_INPUT).to_string(),
            product_info: form.value(PRODUCT_INFO_INPUT).to_string(),
        }
    }

    fn present(response: GeneratorResponse) -> Outcome {
        let plan: PitchPlan = match open(response) {
            Ok(plan) => plan,
            Err(outcome) => return outcome,
        };
        let pains = plan.pain_point_analysis;
        let cta = plan.strategic_cta;

        let mut map = DisplayMap::new()
            .with(
                "Elevator Pitch",
                fields::or_fallback(plan.elevator_pitch_30sec, NOT_AVAILABLE),
            )
            .with("Primary Pain", fields::or_fallback(pains.primary_pain, NOT_AVAILABLE))
            .with("Secondary Pains", fields::join_or(&pains.secondary_pains, "; ", "None"));

        for (index, item) in plan.differentiators.unwrap_or_default().into_iter().enumerate() {
            map.push(
                format!("Differentiator {}", index + 1),
                fields::or_fallback(item.differentiator, NOT_AVAILABLE),
            );
            map.push("  For the Role", fields::or_fallback(item.benefits_for_role, NOT_AVAILABLE));
            map.push("  Impact", fields::or_fallback(item.impact, NOT_AVAILABLE));
        }

        map.push("Next Step", fields::or_fallback(cta.immediate_next_step, NOT_AVAILABLE));
        map.push("Angle", fields::or_fallback(cta.suggested_angle, NOT_AVAILABLE));
        map.push("Objection Handler", fields::or_fallback(cta.objection_handler, NOT_AVAILABLE));

        for (index, question) in plan.discovery_questions.into_iter().enumerate() {
            map.push(format!("Question {}", index + 1), question);
        }

        Outcome::Display(map.with(
            "Social Proof",
            fields::join_or(&plan.social_proof_angles, "; ", "None"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Intelligent lead scorer
// ---------------------------------------------------------------------------

pub struct LeadScore;

/// All four values are free text; the backend extracts what it needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadScoreRequest {
    pub budget: String,
    pub timeline: String,
    pub urgency: String,
    pub additional_context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeadAssessment {
    /// 0–100.
    #[serde(default, deserialize_with = "fields::text")]
    pub lead_score: Option<String>,
    /// Already a percentage.
    #[serde(default, deserialize_with = "fields::text")]
    pub conversion_probability: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub reasoning: Option<String>,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub key_strengths: Vec<String>,
    #[serde(default, deserialize_with = "fields::text_list")]
    pub risk_factors: Vec<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub recommended_action: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub sales_strategy: Option<String>,
}

impl Module for LeadScore {
    const NAME: &'static str = "Lead scoring";
    const ENDPOINT: &'static str = endpoints::LEAD_SCORE;
    const PANEL_ID: &'static str = "lead-score-result";

    type Request = LeadScoreRequest;
    type Response = GeneratorResponse;

    fn read(form: &FormInput) -> LeadScoreRequest {
        LeadScoreRequest {
            budget: form.value(BUDGET_INPUT).to_string(),
            timeline: form.value(TIMELINE_INPUT).to_string(),
            urgency: form.value(URGENCY_INPUT).to_string(),
            additional_context: form.value(CONTEXT_INPUT).to_string(),
        }
    }

    fn present(response: GeneratorResponse) -> Outcome {
        let lead: LeadAssessment = match open(response) {
            Ok(lead) => lead,
            Err(outcome) => return outcome,
        };

        let score = lead
            .lead_score
            .map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{s}/100"));
        let probability = lead
            .conversion_probability
            .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p}%"));

        Outcome::Display(
            DisplayMap::new()
                .with("Lead Score", score)
                .with("Conversion Probability", probability)
                .with("Reasoning", fields::or_fallback(lead.reasoning, NOT_AVAILABLE))
                .with("Strengths", fields::join_or(&lead.key_strengths, "; ", "None"))
                .with("Risks", fields::join_or(&lead.risk_factors, "; ", "None"))
                .with(
                    "Recommended Action",
                    fields::or_fallback(lead.recommended_action, NOT_AVAILABLE),
                )
                .with(
                    "Sales Strategy",
                    fields::or_fallback(lead.sales_strategy, NOT_AVAILABLE),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn present<M: Module<Response = GeneratorResponse>>(body: Value) -> Outcome {
        M::present(serde_json::from_value(body).unwrap())
    }

    fn display<M: Module<Response = GeneratorResponse>>(body: Value) -> DisplayMap {
        match present::<M>(body) {
            Outcome::Display(map) => map,
            Outcome::Rejected(msg) => panic!("unexpected rejection: {msg}"),
        }
    }

    #[test]
    fn envelope_error_rejects() {
        assert_eq!(
            present::<LeadScore>(json!({ "error": "Missing required fields: budget, timeline, urgency" })),
            Outcome::Rejected("Missing required fields: budget, timeline, urgency".to_string())
        );
    }

    #[test]
    fn unparsed_model_output_rejects_with_its_error() {
        assert_eq!(
            present::<MarketingCampaign>(json!({
                "result": { "error": "Failed to parse response", "raw_response": "Sure! Here is..." }
            })),
            Outcome::Rejected("Failed to parse response".to_string())
        );
    }

    #[test]
    fn string_result_is_shown_verbatim() {
        let map = display::<SalesPitch>(json!({ "result": "Lead with ROI." }));
        assert_eq!(map.rows(), &[(RESULT_LABEL.to_string(), "Lead with ROI.".to_string())]);
    }

    #[test]
    fn campaign_rows_follow_plan_order() {
        let map = display::<MarketingCampaign>(json!({
            "result": {
                "campaign_objectives": ["Grow pipeline", "Raise awareness"],
                "content_ideas": [
                    { "id": 1, "title": "ROI guide", "format": "article",
                      "key_message": "Save time", "engagement_angle": "Budget season" }
                ],
                "ad_copy_variations": [
                    { "variation": 1, "headline": "Open rates up 40%", "body": "Try it", "tone": "urgent" }
                ],
                "platform_specific_ctas": { "linkedin": "Book a demo", "email": "Reply yes" },
                "campaign_timeline": "6 weeks",
                "expected_kpis": { "click_through_rate": "2.5%", "lead_quality_score": 8 }
            }
        }));

        let labels: Vec<&str> = map.rows().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Objective 1",
                "Objective 2",
                "Idea 1",
                "  Message",
                "  Angle",
                "Ad 1",
                "  Body",
                "LinkedIn CTA",
                "Email CTA",
                "Web CTA",
                "Timeline",
                "Click-through Rate",
                "Conversion Rate",
                "Lead Quality",
            ]
        );
        assert_eq!(map.get("Idea 1"), Some("ROI guide (article)"));
        assert_eq!(map.get("Ad 1"), Some("Open rates up 40% (URGENT)"));
        assert_eq!(map.get("Web CTA"), Some("N/A"));
        assert_eq!(map.get("Lead Quality"), Some("8"));
    }

    #[test]
    fn campaign_tolerates_mistyped_sections() {
        let map = display::<MarketingCampaign>(json!({
            "result": {
                "campaign_objectives": "one big goal",
                "content_ideas": { "title": "not a list" },
                "platform_specific_ctas": ["linkedin"],
                "expected_kpis": "high"
            }
        }));
        assert_eq!(map.get("Objective 1"), None);
        assert_eq!(map.get("Idea 1"), None);
        assert_eq!(map.get("LinkedIn CTA"), Some("N/A"));
        assert_eq!(map.get("Conversion Rate"), Some("N/A"));
    }

    #[test]
    fn pitch_lists_differentiators_and_questions() {
        let map = display::<SalesPitch>(json!({
            "result": {
                "elevator_pitch_30sec": "We cut ramp time in half.",
                "pain_point_analysis": {
                    "primary_pain": "Slow onboarding",
                    "secondary_pains": ["Churn", "Forecast misses"]
                },
                "differentiators": [
                    { "differentiator": "Live coaching", "benefits_for_role": "Hit quota", "impact": "+20% win rate" },
                    { "differentiator": "CRM sync" }
                ],
                "strategic_cta": { "immediate_next_step": "Book a 20-minute call" },
                "discovery_questions": ["How long is ramp today?"],
                "social_proof_angles": []
            }
        }));

        assert_eq!(map.get("Elevator Pitch"), Some("We cut ramp time in half."));
        assert_eq!(map.get("Secondary Pains"), Some("Churn; Forecast misses"));
        assert_eq!(map.get("Differentiator 2"), Some("CRM sync"));
        assert_eq!(map.get("Next Step"), Some("Book a 20-minute call"));
        assert_eq!(map.get("Objection Handler"), Some("N/A"));
        assert_eq!(map.get("Question 1"), Some("How long is ramp today?"));
        assert_eq!(map.get("Social Proof"), Some("None"));

        let impacts = map.rows().iter().filter(|(l, _)| l == "  Impact").count();
        assert_eq!(impacts, 2);
    }

    #[test]
    fn lead_score_formats_score_and_probability() {
        let map = display::<LeadScore>(json!({
            "result": {
                "lead_score": 86,
                "conversion_probability": 75,
                "reasoning": "Budget and timeline both qualify.",
                "key_strengths": ["High interest", "Qualified budget"],
                "risk_factors": [],
                "recommended_action": "Contact immediately",
                "sales_strategy": "Focus on value proposition"
            }
        }));
        assert_eq!(map.get("Lead Score"), Some("86/100"));
        assert_eq!(map.get("Conversion Probability"), Some("75%"));
        assert_eq!(map.get("Strengths"), Some("High interest; Qualified budget"));
        assert_eq!(map.get("Risks"), Some("None"));
    }

    #[test]
    fn missing_result_shows_placeholders() {
        let map = display::<LeadScore>(json!({}));
        assert_eq!(map.get("Lead Score"), Some("N/A"));
        assert_eq!(map.get("Conversion Probability"), Some("N/A"));
        assert_eq!(map.get("Reasoning"), Some("N/A"));
    }

    #[test]
    fn read_sends_optional_fields_as_empty_text() {
        let form = FormInput::new()
            .with(PROSPECT_TITLE_INPUT, "VP of Sales")
            .with(COMPANY_TIER_INPUT, "Mid-Market");
        assert_eq!(
            serde_json::to_value(SalesPitch::read(&form)).unwrap(),
            json!({ "prospect_title": "VP of Sales", "company_tier": "Mid-Market", "product_info": "" })
        );

        let form = FormInput::new()
            .with(BUDGET_INPUT, "$250000")
            .with(TIMELINE_INPUT, "This Quarter")
            .with(URGENCY_INPUT, "High");
        assert_eq!(
            serde_json::to_value(LeadScore::read(&form)).unwrap(),
            json!({ "budget": "$250000", "timeline": "This Quarter", "urgency": "High", "additional_context": "" })
        );
    }
}
