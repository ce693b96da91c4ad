//! Provider independent request pipeline: validate, fetch, normalize, wrap.

use crate::core::adapter::ProviderAdapter;
use crate::core::error::ProxyError;
use crate::core::fetch::FetchExecutor;
use crate::core::series::{IndicatorRequest, NormalizedPayload};
use crate::providers::util::truncate_chars;
use axum::http::Method;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PAYLOAD_PREVIEW_CHARS: usize = 200;

/// Headers attached to every response, whatever its status.
pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            "GET, OPTIONS".to_string(),
        ),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

/// Complete response for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseEnvelope {
    pub fn new(status_code: u16, body: String) -> Self {
        ResponseEnvelope {
            status_code,
            headers: cors_headers(),
            body,
        }
    }

    pub fn preflight() -> Self {
        Self::new(200, String::new())
    }

    pub fn json(status_code: u16, body: &Value) -> Self {
        Self::new(status_code, body.to_string())
    }

    pub fn from_error(err: &ProxyError) -> Self {
        Self::json(err.status_code(), &err.to_body())
    }
}

/// One proxy endpoint: a provider adapter plus the executor it fetches with.
pub struct RequestHandler {
    adapter: Arc<dyn ProviderAdapter>,
    executor: Arc<dyn FetchExecutor>,
    timeout: Duration,
}

impl RequestHandler {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        executor: Arc<dyn FetchExecutor>,
        timeout: Duration,
    ) -> Self {
        RequestHandler {
            adapter,
            executor,
            timeout,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.adapter.name()
    }

    #[instrument(
        name = "ProxyRequest",
        skip(self, query),
        fields(provider = self.adapter.name())
    )]
    pub async fn handle(&self, method: &Method, query: &HashMap<String, String>) -> ResponseEnvelope {
        if *method == Method::OPTIONS {
            return ResponseEnvelope::preflight();
        }
        if *method != Method::GET {
            return ResponseEnvelope::from_error(&ProxyError::MethodNotAllowed);
        }

        let Some(request) = IndicatorRequest::from_query(query) else {
            debug!(?query, "Rejecting request with missing parameters");
            return ResponseEnvelope::from_error(&ProxyError::Validation);
        };

        match self.fetch(&request).await {
            Ok(payload) => match serde_json::to_string(&payload) {
                Ok(body) => ResponseEnvelope::new(200, body),
                Err(e) => {
                    error!(error = %e, "Failed to encode normalized payload");
                    ResponseEnvelope::from_error(&ProxyError::MalformedPayload {
                        provider: self.adapter.name(),
                        message: e.to_string(),
                        raw: String::new(),
                    })
                }
            },
            Err(err) => {
                error!(error = %err, "Proxy request failed");
                ResponseEnvelope::from_error(&err)
            }
        }
    }

    /// Runs the upstream part of the pipeline for an already validated
    /// request.
    pub async fn fetch(&self, request: &IndicatorRequest) -> Result<NormalizedPayload, ProxyError> {
        let provider = self.adapter.name();
        let url = self.adapter.build_url(request);
        info!(%url, "Fetching from {}", provider);

        let response = self
            .executor
            .execute(&url, &self.adapter.headers(), self.timeout)
            .await
            .map_err(|e| ProxyError::from_fetch(provider, e))?;

        info!(status = response.status, "{} responded", provider);
        debug!(
            payload = %truncate_chars(&response.body, PAYLOAD_PREVIEW_CHARS),
            "Upstream payload preview"
        );

        self.adapter.check_status(&response)?;
        self.adapter.parse(&response.body)
    }
}
