//! Failure taxonomy of the proxy pipeline and its JSON error bodies

use crate::core::fetch::FetchError;
use serde_json::{Map, Value, json};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    #[error("Missing required parameters: indicator, country, startYear, endYear")]
    Validation,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Non-success status from the provider. `error` and `message` are
    /// chosen by the adapter; `extra` carries adapter specific diagnostics.
    #[error("{message}")]
    UpstreamHttp {
        error: String,
        message: String,
        extra: Map<String, Value>,
    },

    #[error("{message}")]
    Transport {
        provider: &'static str,
        message: String,
        code: Option<String>,
    },

    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },

    #[error("{message}")]
    MalformedPayload {
        provider: &'static str,
        message: String,
        raw: String,
    },
}

impl ProxyError {
    pub fn from_fetch(provider: &'static str, err: FetchError) -> Self {
        match err {
            FetchError::Timeout(timeout) => ProxyError::Timeout { provider, timeout },
            FetchError::Transport { message, code } => ProxyError::Transport {
                provider,
                message,
                code,
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Validation => 400,
            ProxyError::MethodNotAllowed => 405,
            ProxyError::UpstreamHttp { .. }
            | ProxyError::Transport { .. }
            | ProxyError::Timeout { .. }
            | ProxyError::MalformedPayload { .. } => 500,
        }
    }

    /// JSON body sent to the client for this failure.
    pub fn to_body(&self) -> Value {
        match self {
            ProxyError::Validation | ProxyError::MethodNotAllowed => {
                json!({ "error": self.to_string() })
            }
            ProxyError::UpstreamHttp {
                error,
                message,
                extra,
            } => {
                let mut body = Map::new();
                body.insert("error".into(), Value::from(error.as_str()));
                body.insert("message".into(), Value::from(message.as_str()));
                body.extend(extra.clone());
                Value::Object(body)
            }
            ProxyError::Transport {
                provider,
                message,
                code,
            } => {
                let mut body = json!({
                    "error": format!("Failed to fetch data from {provider}"),
                    "message": message,
                });
                if let Some(code) = code {
                    body["code"] = Value::from(code.as_str());
                }
                body
            }
            ProxyError::Timeout { provider, .. } => json!({
                "error": format!("Failed to fetch data from {provider}"),
                "message": self.to_string(),
            }),
            ProxyError::MalformedPayload {
                provider,
                message,
                raw,
            } => json!({
                "error": format!("Invalid response from {provider}"),
                "message": message,
                "rawResponse": raw,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyError::Validation.status_code(), 400);
        assert_eq!(ProxyError::MethodNotAllowed.status_code(), 405);
        let timeout = ProxyError::Timeout {
            provider: "IMF API",
            timeout: Duration::from_secs(30),
        };
        assert_eq!(timeout.status_code(), 500);
    }

    #[test]
    fn test_client_error_bodies() {
        assert_eq!(
            ProxyError::Validation.to_body(),
            json!({"error": "Missing required parameters: indicator, country, startYear, endYear"})
        );
        assert_eq!(
            ProxyError::MethodNotAllowed.to_body(),
            json!({"error": "Method not allowed"})
        );
    }

    #[test]
    fn test_transport_body_includes_code() {
        let err = ProxyError::from_fetch(
            "World Bank API",
            FetchError::Transport {
                message: "connection refused".to_string(),
                code: Some("connect".to_string()),
            },
        );
        assert_eq!(
            err.to_body(),
            json!({
                "error": "Failed to fetch data from World Bank API",
                "message": "connection refused",
                "code": "connect",
            })
        );
    }

    #[test]
    fn test_timeout_body() {
        let err = ProxyError::from_fetch("IMF API", FetchError::Timeout(Duration::from_secs(30)));
        assert_eq!(
            err.to_body(),
            json!({
                "error": "Failed to fetch data from IMF API",
                "message": "Request timed out after 30000ms",
            })
        );
    }

    #[test]
    fn test_upstream_http_body_merges_extra_fields() {
        let mut extra = Map::new();
        extra.insert("status".into(), Value::from(502));
        let err = ProxyError::UpstreamHttp {
            error: "World Bank API returned an error".to_string(),
            message: "World Bank API responded with status 502".to_string(),
            extra,
        };
        assert_eq!(
            err.to_body(),
            json!({
                "error": "World Bank API returned an error",
                "message": "World Bank API responded with status 502",
                "status": 502,
            })
        );
    }
}
