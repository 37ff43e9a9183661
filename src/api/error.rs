use thiserror::Error;

/// Failure of a single backend call.
///
/// The `Display` text is what handlers show after their module prefix, e.g.
/// `Benchmark failed: HTTP 502: Bad Gateway`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("{0}")]
    Network(String),

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_message_carries_code_and_text() {
        let err = ApiError::RequestFailed {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn network_error_keeps_native_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status(), None);
    }
}
