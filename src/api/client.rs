/// Synchronous HTTP client for the growth platform API.
///
/// One POST (or GET) per call, no retries and no timeout: a hung backend
/// blocks the caller until the connection gives up on its own.
use serde_json::Value;

use super::error::ApiError;
use super::Transport;
use crate::config::schema::ApiConfig;

/// `ureq`-backed [`Transport`].
///
/// Holds a shared agent so keep-alive connections are reused across the
/// handlers of a single dashboard session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    api_root: String,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:5000`) and an
    /// API root (e.g. `/api`).
    pub fn new(base_url: &str, api_root: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_root: normalize_root(api_root),
        }
    }

    /// Build a client from the resolved `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, &config.api_root)
    }

    /// Full URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_root, endpoint)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

impl Transport for ApiClient {
    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiError> {
        let result = self
            .agent
            .post(&self.url(endpoint))
            .set("Content-Type", "application/json")
            .send_json(payload);

        match result {
            Ok(resp) => resp
                .into_json::<Value>()
                .map_err(|e| ApiError::Decode(e.to_string())),
            Err(ureq::Error::Status(status, resp)) => Err(ApiError::RequestFailed {
                status,
                status_text: resp.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(t)) => Err(ApiError::Network(t.to_string())),
        }
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        let resp = match self.agent.get(&self.url(endpoint)).call() {
            Ok(resp) => resp,
            // The status is not checked here: an unhealthy backend usually
            // still answers with a JSON body worth logging.
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(ApiError::Network(t.to_string())),
        };

        resp.into_json::<Value>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Ensure the API root has exactly one leading slash and no trailing slash.
///
/// An empty root stays empty so endpoints hang directly off the base URL.
fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_root_and_endpoint() {
        let client = ApiClient::new("http://localhost:5000", "/api");
        assert_eq!(
            client.url("/market/sentiment"),
            "http://localhost:5000/api/market/sentiment"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000/", "api/");
        assert_eq!(client.url("/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn empty_root_hangs_endpoints_off_base() {
        let client = ApiClient::new("http://example.test", "");
        assert_eq!(client.url("/chat"), "http://example.test/chat");
    }

    #[test]
    fn default_client_targets_local_backend() {
        let client = ApiClient::default();
        assert_eq!(client.url("/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        // Port 9 (discard) on localhost is essentially never listening.
        let client = ApiClient::new("http://127.0.0.1:9", "/api");
        let err = client
            .post_json("/chat", &serde_json::json!({ "message": "hi" }))
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }
}
