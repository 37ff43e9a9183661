//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use growthdash::api::{ApiError, Transport};
use serde_json::Value;

/// One recorded call: method, endpoint and (for POST) the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub endpoint: String,
    pub payload: Option<Value>,
}

/// In-memory [`Transport`] that answers from a script and records calls.
///
/// When the script runs out every call fails with a network error, so a
/// test that makes more calls than expected fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering every scripted call with `body`, once.
    pub fn replying(body: Value) -> Self {
        Self::new().then(Ok(body))
    }

    /// Transport failing its first call with `err`.
    pub fn failing(err: ApiError) -> Self {
        Self::new().then(Err(err))
    }

    /// Queue another reply.
    pub fn then(self, reply: Result<Value, ApiError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: Call) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("script exhausted".to_string())))
    }
}

impl Transport for ScriptedTransport {
    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiError> {
        self.answer(Call {
            method: "POST",
            endpoint: endpoint.to_string(),
            payload: Some(payload.clone()),
        })
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.answer(Call {
            method: "GET",
            endpoint: endpoint.to_string(),
            payload: None,
        })
    }
}

/// The rejection used across failure tests.
pub fn server_error() -> ApiError {
    ApiError::RequestFailed {
        status: 500,
        status_text: "Internal Server Error".to_string(),
    }
}
