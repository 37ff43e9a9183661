//! HTTP access to the growth platform backend.
//!
//! Every call goes through the [`Transport`] trait so handlers never touch
//! the network directly. [`ApiClient`] is the real implementation (sync,
//! via `ureq`); tests drive handlers with scripted transports instead.
//!
//! All endpoint paths are relative to the API root (`/api` by default).

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

use serde_json::Value;

/// Default API root prefixed to every endpoint path.
pub const DEFAULT_API_ROOT: &str = "/api";

/// Endpoint paths consumed by the dashboard.
pub mod endpoints {
    pub const SENTIMENT: &str = "/market/sentiment";
    pub const BENCHMARK: &str = "/market/benchmark";
    pub const PRICING: &str = "/pricing/optimize";
    pub const COMPLIANCE: &str = "/compliance/check";
    pub const CHAT: &str = "/chat";
    pub const PREDICTION: &str = "/predict/customer";
    pub const PERSONALIZATION: &str = "/personalize";
    pub const MARKETING_CAMPAIGN: &str = "/generator/marketing-campaign";
    pub const SALES_PITCH: &str = "/generator/sales-pitch";
    pub const LEAD_SCORE: &str = "/generator/lead-score";
    /// GET only.
    pub const HEALTH: &str = "/health";
}

/// A single-attempt JSON transport to the backend.
///
/// Implementations must not retry: a failure surfaces immediately to the
/// caller, which decides how to render it.
pub trait Transport {
    /// POST `payload` as JSON to `endpoint` and return the parsed JSON body.
    ///
    /// Non-2xx responses fail with [`ApiError::RequestFailed`].
    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiError>;

    /// GET `endpoint` and parse the body as JSON.
    ///
    /// The status code is not checked; only transport and decode failures
    /// are errors.
    fn get_json(&self, endpoint: &str) -> Result<Value, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiError> {
        (**self).post_json(endpoint, payload)
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        (**self).get_json(endpoint)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiError> {
        (**self).post_json(endpoint, payload)
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        (**self).get_json(endpoint)
    }
}
