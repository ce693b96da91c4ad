//! Outbound fetch abstraction

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Status and body of an upstream response. Non-2xx statuses are returned
/// as-is; deciding whether they are failures is left to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("{message}")]
    Transport {
        message: String,
        code: Option<String>,
    },
}

/// Performs a single GET per call. No retries.
#[async_trait]
pub trait FetchExecutor: Send + Sync {
    async fn execute(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<UpstreamResponse, FetchError>;
}
