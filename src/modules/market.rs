//! Market intelligence: customer sentiment and competitor benchmark.

use serde::{Deserialize, Serialize};

use super::fields::{self, NOT_AVAILABLE};
use super::{FormInput, Module, Outcome};
use crate::api::endpoints;
use crate::render::DisplayMap;

// ---------------------------------------------------------------------------
// Sentiment analysis
// ---------------------------------------------------------------------------

pub struct Sentiment;

/// Form field holding the feedback text.
pub const SENTIMENT_INPUT: &str = "sentiment-input";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRequest {
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SentimentResponse {
    #[serde(default, deserialize_with = "fields::text")]
    pub sentiment: Option<String>,
    /// Fraction in 0–1.
    #[serde(default, deserialize_with = "fields::number")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "fields::text")]
    pub summary: Option<String>,
}

impl Module for Sentiment {
    const NAME: &'static str = "Sentiment Analysis";
    const ENDPOINT: &'static str = endpoints::SENTIMENT;
    const PANEL_ID: &'static str = "sentiment-result";

    type Request = SentimentRequest;
    type Response = SentimentResponse;

    fn read(form: &FormInput) -> SentimentRequest {
        SentimentRequest {
            feedback: form.value(SENTIMENT_INPUT).to_string(),
        }
    }

    fn present(response: SentimentResponse) -> Outcome {
        let confidence = response
            .confidence
            .map_or_else(|| NOT_AVAILABLE.to_string(), fields::fraction_percent);

        Outcome::Display(
            DisplayMap::new()
                .with("Sentiment", fields::upper_or(response.sentiment, NOT_AVAILABLE))
                .with("Confidence", confidence)
                .with(
                    "Summary",
                    fields::or_fallback(response.summary, "No summary available"),
                ),
        )
    }
}

// ---------------------------------------------------------------------------
// Competitor benchmark
// ---------------------------------------------------------------------------

pub struct Benchmark;

/// Form field holding the brand name.
pub const BENCHMARK_INPUT: &str = "benchmark-input";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRequest {
    pub brand: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BenchmarkResponse {
    /// Score out of 100.
    #[serde(default, deserialize_with = "fields::text")]
    pub market_score: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub trend: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub market_position: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub key_strength: Option<String>,
    #[serde(default, deserialize_with = "fields::text")]
    pub key_weakness: Option<String>,
}

impl Module for Benchmark {
    const NAME: &'static str = "Benchmark";
    const ENDPOINT: &'static str = endpoints::BENCHMARK;
    const PANEL_ID: &'static str = "benchmark-result";

    type Request = BenchmarkRequest;
    type Response = BenchmarkResponse;

    fn read(form: &FormInput) -> BenchmarkRequest {
        BenchmarkRequest {
            brand: form.value(BENCHMARK_INPUT).to_string(),
        }
    }

    fn present(response: BenchmarkResponse) -> Outcome {
        let score = response
            .market_score
            .map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{s}/100"));

        Outcome::Display(
            DisplayMap::new()
                .with("Market Score", score)
                .with("Trend", fields::upper_or(response.trend, NOT_AVAILABLE))
                .with(
                    "Position",
                    fields::or_fallback(response.market_position, NOT_AVAILABLE),
                )
                .with(
                    "Key Strength",
                    fields::or_fallback(response.key_strength, NOT_AVAILABLE),
                )
                .with(
                    "Key Weakness",
                    fields::or_fallback(response.key_weakness, NOT_AVAILABLE),
                ),
        )
    }
}
