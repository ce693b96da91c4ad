//! Per-provider request building and response normalization

use crate::core::error::ProxyError;
use crate::core::fetch::UpstreamResponse;
use crate::core::series::{IndicatorRequest, NormalizedPayload};
use std::collections::BTreeMap;

/// What the request handler needs to know about one upstream provider.
///
/// Status policy lives here rather than in the executor because providers
/// disagree on what a failed response looks like to the client.
pub trait ProviderAdapter: Send + Sync {
    /// Display name used in error bodies and logs, e.g. `"IMF API"`.
    fn name(&self) -> &'static str;

    fn build_url(&self, request: &IndicatorRequest) -> String;

    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("Accept".to_string(), "application/json".to_string())])
    }

    /// Rejects upstream responses this provider treats as failures.
    fn check_status(&self, response: &UpstreamResponse) -> Result<(), ProxyError>;

    fn parse(&self, body: &str) -> Result<NormalizedPayload, ProxyError>;
}
