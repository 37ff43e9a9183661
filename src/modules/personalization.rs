//! Personalization engine: product recommendations for a user profile.

use serde::{Deserialize, Serialize};

use super::fields::{self, NOT_AVAILABLE};
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

pub struct Personalization;

pub const PERSONALIZATION_INPUT: &str = "personalization-input";

/// Label of the reason row emitted under each product.
pub const REASON_LABEL: &str = "  Reason";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizationRequest {
    pub user_profile: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonalizationResponse {
    #[serde(default, deserialize_with = "fields::record_list")]
    pub recommended_products: Option<Vec<RecommendedProduct>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecommendedProduct {
    #[serde(default, deserialize_with = "fields::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub reason: Option<String>,
}

impl Module for Personalization {
    const NAME: &'static str = "Personalization";
    const ENDPOINT: &'static str = endpoints::PERSONALIZATION;
    const PANEL_ID: &'static str = "personalization-result";

    type Request = PersonalizationRequest;
    type Response = PersonalizationResponse;

    fn read(form: &FormInput) -> PersonalizationRequest {
        PersonalizationRequest {
            user_profile: form.value(PERSONALIZATION_INPUT).to_string(),
        }
    }

    fn present(response: PersonalizationResponse) -> Outcome {
        let mut map = DisplayMap::new();

        for (index, product) in response
            .recommended_products
            .unwrap_or_default()
            .into_iter()
            .enumerate()
        {
            let name = fields::or_fallback(product.name, NOT_AVAILABLE);
            let priority = fields::upper_or(product.priority, "NORMAL");
            map.push(format!("Product {}", index + 1), format!("{name} ({priority})"));
            map.push(
                REASON_LABEL,
                fields::or_fallback(product.reason, NOT_AVAILABLE),
            );
        }

        Outcome::Display(map)
    }
}
