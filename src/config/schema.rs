/// Configuration schema and defaults for growthdash.
///
/// Defines the TOML-serializable configuration with the sections `[api]`,
/// `[health]`, `[logging]`, and `[display]`. Every field has a built-in
/// default; config files only need the values they change.
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_ROOT;

/// Default backend address (the backend's local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default health poll interval in seconds.
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;

/// Default activity log location. `~` is expanded to the home directory.
pub const DEFAULT_LOG_PATH: &str = "~/.growthdash/activity.jsonl";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level growthdash configuration.
///
/// Maps directly to `~/.growthdash/config.toml` and `.growthdash.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub api: ApiConfig,
    pub health: HealthConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Backend location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the backend, without a path.
    pub base_url: String,
    /// Path prefix shared by every endpoint.
    pub api_root: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [health]
// ---------------------------------------------------------------------------

/// Background health poller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Whether the interactive dashboard starts the poller.
    pub enabled: bool,
    /// Seconds between pings. Values below 1 are treated as 1.
    pub interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_HEALTH_INTERVAL_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Activity log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Path to the JSONL activity log.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_LOG_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colored terminal output.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl DashConfig {
    /// Annotated default config written by `growthdash config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# growthdash configuration
#
# Layers (later wins): built-in defaults, ~/.growthdash/config.toml,
# ./.growthdash.toml, GROWTHDASH_* environment variables.

[api]
# Backend address and the path prefix shared by every endpoint.
base_url = "{DEFAULT_BASE_URL}"
api_root = "{DEFAULT_API_ROOT}"

[health]
# Background health ping while the interactive dashboard is open.
enabled = true
interval_secs = {DEFAULT_HEALTH_INTERVAL_SECS}

[logging]
# JSONL activity log of submissions, chat exchanges and health pings.
enabled = true
path = "{DEFAULT_LOG_PATH}"

[display]
color = true
"#
        )
    }
}
