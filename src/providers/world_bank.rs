//! World Bank Indicators API (v2) adapter.
//!
//! The API answers `[metadata, observations]`; observations are flattened into
//! a [`CanonicalSeries`] keyed by year.

use super::util::truncate_chars;
use crate::core::adapter::ProviderAdapter;
use crate::core::codes::{CodeDomain, translate};
use crate::core::error::ProxyError;
use crate::core::fetch::UpstreamResponse;
use crate::core::series::{CanonicalSeries, IndicatorRequest, NormalizedPayload};
use serde_json::{Map, Value};
use tracing::{debug, error};

const PROVIDER: &str = "World Bank API";
const LOG_PREVIEW_CHARS: usize = 200;
const DIAGNOSTIC_CHARS: usize = 500;

pub struct WorldBankAdapter {
    base_url: String,
}

impl WorldBankAdapter {
    pub fn new(base_url: &str) -> Self {
        WorldBankAdapter {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn malformed(message: String, body: &str) -> ProxyError {
        ProxyError::MalformedPayload {
            provider: PROVIDER,
            message,
            raw: truncate_chars(body, DIAGNOSTIC_CHARS).to_string(),
        }
    }
}

/// Leading-digit year parse, so `"2020"` and `"2020Q1"` both yield 2020.
fn parse_year(date: &Value) -> Option<i32> {
    match date {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let trimmed = s.trim_start();
            let end = trimmed
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(trimmed.len());
            trimmed[..end].parse().ok()
        }
        _ => None,
    }
}

/// Flattens the observation list. Entries without a date or with a null
/// value are skipped; a repeated year keeps the last value seen.
fn flatten_observations(observations: &[Value]) -> CanonicalSeries {
    let mut series = CanonicalSeries::new();
    for observation in observations {
        let year = observation.get("date").and_then(parse_year);
        let value = observation.get("value").and_then(Value::as_f64);
        if let (Some(year), Some(value)) = (year, value) {
            series.insert(year, value);
        }
    }
    series
}

impl ProviderAdapter for WorldBankAdapter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build_url(&self, request: &IndicatorRequest) -> String {
        format!(
            "{}/v2/country/{}/indicator/{}?format=json&date={}:{}",
            self.base_url,
            translate(CodeDomain::Country, &request.country),
            translate(CodeDomain::Indicator, &request.indicator),
            request.start_year,
            request.end_year
        )
    }

    fn check_status(&self, response: &UpstreamResponse) -> Result<(), ProxyError> {
        if response.status == 200 {
            return Ok(());
        }

        error!(
            status = response.status,
            body = %truncate_chars(&response.body, LOG_PREVIEW_CHARS),
            "World Bank API returned an error"
        );
        let mut extra = Map::new();
        extra.insert("status".into(), Value::from(response.status));
        extra.insert(
            "details".into(),
            Value::from(truncate_chars(&response.body, DIAGNOSTIC_CHARS)),
        );
        Err(ProxyError::UpstreamHttp {
            error: format!("{PROVIDER} returned an error"),
            message: format!("{PROVIDER} responded with status {}", response.status),
            extra,
        })
    }

    fn parse(&self, body: &str) -> Result<NormalizedPayload, ProxyError> {
        let document: Value = serde_json::from_str(body)
            .map_err(|e| Self::malformed(format!("Failed to parse JSON response: {e}"), body))?;

        let parts = match document.as_array() {
            Some(parts) if parts.len() >= 2 => parts,
            Some(parts) => {
                return Err(Self::malformed(
                    format!("Expected [metadata, observations], got {} element(s)", parts.len()),
                    body,
                ));
            }
            None => {
                return Err(Self::malformed(
                    "Expected [metadata, observations] array".to_string(),
                    body,
                ));
            }
        };

        // An empty result set comes back as `[metadata, null]`.
        let series = match &parts[1] {
            Value::Array(observations) => flatten_observations(observations),
            Value::Null => CanonicalSeries::new(),
            _ => {
                return Err(Self::malformed(
                    "Observation list is not an array".to_string(),
                    body,
                ));
            }
        };

        debug!(years = series.values.len(), "Normalized World Bank observations");
        Ok(NormalizedPayload::Series(series))
    }
}
