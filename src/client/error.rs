//! Error types for backend requests.

use thiserror::Error;

/// Errors that can occur while talking to the monitoring backend.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, TLS)
    #[error("could not connect to backend: {0}")]
    Transport(String),

    /// Configured request timeout elapsed
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Backend answered 2xx with a body of the wrong shape
    #[error("invalid response: {0}")]
    Decode(String),

    /// Client could not be constructed
    #[error("invalid client configuration: {0}")]
    Setup(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a failed response body.
    ///
    /// Uses the body's `detail` string when there is one, `HTTP <status>`
    /// when the body is JSON without it, and `Request failed (HTTP <status>)`
    /// when the body is not JSON at all.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match value.get("detail").and_then(|d| d.as_str()) {
                Some(detail) if !detail.is_empty() => detail.to_string(),
                _ => format!("HTTP {}", status),
            },
            Err(_) => format!("Request failed (HTTP {})", status),
        };
        ClientError::Api { status, message }
    }

    /// HTTP status code, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_used_verbatim() {
        let err = ClientError::from_response_body(404, r#"{"detail": "Provider not found"}"#);
        assert_eq!(err.to_string(), "Provider not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_json_without_detail_falls_back_to_status() {
        let err = ClientError::from_response_body(500, r#"{"error": "boom"}"#);
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_non_string_detail_falls_back_to_status() {
        // Validation errors carry a list instead of a string
        let err = ClientError::from_response_body(422, r#"{"detail": [{"loc": ["body"]}]}"#);
        assert_eq!(err.to_string(), "HTTP 422");
    }

    #[test]
    fn test_unparsable_body_is_generic() {
        let err = ClientError::from_response_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "Request failed (HTTP 502)");
    }

    #[test]
    fn test_transport_display() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "could not connect to backend: connection refused"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(ClientError::Timeout(5).to_string(), "request timeout after 5s");
    }
}
