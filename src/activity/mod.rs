//! Activity log: one JSON line per module submission, chat exchange and
//! health ping.
//!
//! Log file: `~/.growthdash/activity.jsonl` (see `[logging]` in the config).
//! Writing is best-effort; a failed append never reaches the user.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::chat::ChatStatus;
use crate::config::{self, schema::LoggingConfig};
use crate::health::HealthReport;
use crate::modules::{ModuleKind, SubmitStatus};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// One activity log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub timestamp: String,
    /// `"submit"`, `"chat"` or `"health"`.
    pub kind: String,
    /// Module name or endpoint the event concerns.
    pub target: String,
    /// `"ok"`, `"rejected"`, `"failed"`, `"ignored"`, ...
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    /// Wall-clock time of the backend call.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl ActivityEvent {
    fn now(kind: &str, target: &str, status: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind: kind.to_string(),
            target: target.to_string(),
            status: status.to_string(),
            detail: None,
            latency_ms: None,
        }
    }

    /// A module submission.
    pub fn submission(kind: ModuleKind, status: &SubmitStatus, latency_ms: u64) -> Self {
        Self {
            detail: status.detail(),
            latency_ms: Some(latency_ms),
            ..Self::now("submit", kind.name(), status.label())
        }
    }

    /// A chat exchange.
    pub fn chat(status: &ChatStatus, latency_ms: u64) -> Self {
        let label = match status {
            ChatStatus::Ignored => "ignored",
            ChatStatus::Replied => "ok",
            ChatStatus::BackendError => "rejected",
            ChatStatus::ConnectionError => "failed",
        };
        Self {
            latency_ms: Some(latency_ms),
            ..Self::now("chat", "/chat", label)
        }
    }

    /// A health ping. The body or error text goes into `detail`.
    pub fn health(report: &HealthReport) -> Self {
        let (status, detail) = match &report.outcome {
            Ok(body) => ("ok", body.to_string()),
            Err(err) => ("failed", err.clone()),
        };
        Self {
            timestamp: report.checked_at.to_rfc3339(),
            detail: Some(detail),
            ..Self::now("health", "/health", status)
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Appends events to the configured log file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: Option<PathBuf>,
}

impl ActivityLog {
    /// Logger for the `[logging]` section; a no-op when disabled.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            path: config.enabled.then(|| config::expand_home(&config.path)),
        }
    }

    /// Logger writing to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Logger that drops every event.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Best-effort: failures are ignored.
    pub fn record(&self, event: &ActivityEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &ActivityEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// The last `limit` events, oldest first. Unreadable lines are skipped;
    /// a missing file is an empty log.
    pub fn recent(&self, limit: usize) -> Vec<ActivityEvent> {
        let Some(content) = self.path.as_ref().and_then(|p| fs::read_to_string(p).ok()) else {
            return Vec::new();
        };

        let events: Vec<ActivityEvent> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        let skip = events.len().saturating_sub(limit);
        events.into_iter().skip(skip).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::modules::SubmitError;

    #[test]
    fn append_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::at(dir.path().join("nested").join("activity.jsonl"));

        log.record(&ActivityEvent::submission(
            ModuleKind::Pricing,
            &SubmitStatus::Rejected("Invalid input values".into()),
            12,
        ));
        log.record(&ActivityEvent::chat(&ChatStatus::Replied, 340));

        let events = log.recent(10);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, "submit");
        assert_eq!(events[0].target, "Pricing optimization");
        assert_eq!(events[0].status, "rejected");
        assert_eq!(events[0].detail.as_deref(), Some("Invalid input values"));
        assert_eq!(events[1].kind, "chat");
        assert_eq!(events[1].latency_ms, Some(340));
    }

    #[test]
    fn recent_keeps_the_newest_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let log = ActivityLog::at(&path);

        for _ in 0..3 {
            log.record(&ActivityEvent::chat(&ChatStatus::Ignored, 0));
        }
        log.record(&ActivityEvent::submission(
            ModuleKind::Sentiment,
            &SubmitStatus::Failed(SubmitError::Api(ApiError::Network("refused".into()))),
            5,
        ));
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();

        let events = log.recent(2);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].target, "Sentiment Analysis");
        assert_eq!(events[1].detail.as_deref(), Some("refused"));
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let log = ActivityLog::from_config(&LoggingConfig {
            enabled: false,
            path: "/definitely/not/written.jsonl".into(),
        });
        assert!(log.path().is_none());
        log.record(&ActivityEvent::chat(&ChatStatus::Replied, 1));
        assert!(log.recent(5).is_empty());
    }

    #[test]
    fn health_event_carries_body() {
        let report = HealthReport {
            checked_at: Utc::now(),
            outcome: Ok(json!({ "status": "healthy" })),
        };
        let event = ActivityEvent::health(&report);
        assert_eq!(event.status, "ok");
        assert_eq!(event.detail.as_deref(), Some(r#"{"status":"healthy"}"#));
    }
}
