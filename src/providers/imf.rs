//! IMF DataMapper adapter.
//!
//! DataMapper already answers with a `values` document keyed down to years,
//! so the payload is forwarded as-is and codes are used without translation.

use super::util::truncate_chars;
use crate::core::adapter::ProviderAdapter;
use crate::core::error::ProxyError;
use crate::core::fetch::UpstreamResponse;
use crate::core::series::{IndicatorRequest, NormalizedPayload};
use serde_json::{Map, Value};
use tracing::error;

const PROVIDER: &str = "IMF API";
const DIAGNOSTIC_CHARS: usize = 200;

pub struct ImfAdapter {
    base_url: String,
}

impl ImfAdapter {
    pub fn new(base_url: &str) -> Self {
        ImfAdapter {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ProviderAdapter for ImfAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build_url(&self, request: &IndicatorRequest) -> String {
        format!(
            "{}/external/datamapper/api/v1/{}/{}?periods={}-{}",
            self.base_url,
            request.indicator,
            request.country,
            request.start_year,
            request.end_year
        )
    }

    fn check_status(&self, response: &UpstreamResponse) -> Result<(), ProxyError> {
        if response.is_success() {
            return Ok(());
        }

        let preview = truncate_chars(&response.body, DIAGNOSTIC_CHARS);
        error!(status = response.status, body = %preview, "IMF API request failed");
        Err(ProxyError::UpstreamHttp {
            error: format!("Failed to fetch data from {PROVIDER}"),
            message: format!(
                "{PROVIDER} responded with status {}: {preview}",
                response.status
            ),
            extra: Map::new(),
        })
    }

    fn parse(&self, body: &str) -> Result<NormalizedPayload, ProxyError> {
        let document: Value =
            serde_json::from_str(body).map_err(|e| ProxyError::MalformedPayload {
                provider: PROVIDER,
                message: format!("Failed to parse JSON response: {e}"),
                raw: truncate_chars(body, DIAGNOSTIC_CHARS).to_string(),
            })?;
        Ok(NormalizedPayload::PassThrough(document))
    }
}
