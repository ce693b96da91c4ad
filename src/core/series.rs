//! Request and series types shared by every provider

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Query parameters accepted by every proxy endpoint.
///
/// Years are carried as the caller sent them and interpolated verbatim into
/// the upstream URL; the upstream provider rejects malformed ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRequest {
    pub indicator: String,
    pub country: String,
    pub start_year: String,
    pub end_year: String,
}

impl IndicatorRequest {
    pub const REQUIRED: [&'static str; 4] = ["indicator", "country", "startYear", "endYear"];

    /// Builds a request from raw query parameters. Returns `None` when any
    /// required parameter is missing or empty.
    pub fn from_query(query: &HashMap<String, String>) -> Option<Self> {
        let field = |name: &str| {
            query
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
        };

        Some(IndicatorRequest {
            indicator: field("indicator")?,
            country: field("country")?,
            start_year: field("startYear")?,
            end_year: field("endYear")?,
        })
    }
}

/// Year keyed observations. A year without an observation has no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeries {
    pub values: BTreeMap<i32, f64>,
}

impl CanonicalSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observation, replacing any earlier value for the same year.
    pub fn insert(&mut self, year: i32, value: f64) {
        self.values.insert(year, value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of a provider adapter's parse step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedPayload {
    /// Flattened series built by the adapter.
    Series(CanonicalSeries),
    /// Upstream document already in canonical shape, forwarded untouched.
    PassThrough(Value),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_query_with_all_parameters() {
        let q = query(&[
            ("indicator", "NGDP_RPCH"),
            ("country", "KR"),
            ("startYear", "2015"),
            ("endYear", "2020"),
        ]);
        let request = IndicatorRequest::from_query(&q).unwrap();
        assert_eq!(request.indicator, "NGDP_RPCH");
        assert_eq!(request.country, "KR");
        assert_eq!(request.start_year, "2015");
        assert_eq!(request.end_year, "2020");
    }

    #[test]
    fn test_from_query_rejects_missing_or_empty_fields() {
        let full = [
            ("indicator", "NGDP_RPCH"),
            ("country", "KR"),
            ("startYear", "2015"),
            ("endYear", "2020"),
        ];
        for skipped in IndicatorRequest::REQUIRED {
            let missing: Vec<_> = full.iter().copied().filter(|(k, _)| *k != skipped).collect();
            assert!(IndicatorRequest::from_query(&query(&missing)).is_none());

            let empty: Vec<_> = full
                .iter()
                .map(|(k, v)| if *k == skipped { (*k, "") } else { (*k, *v) })
                .collect();
            assert!(IndicatorRequest::from_query(&query(&empty)).is_none());
        }
    }

    #[test]
    fn test_series_serializes_years_as_object_keys() {
        let mut series = CanonicalSeries::new();
        series.insert(2022, 3.0);
        series.insert(2020, 5.1);
        series.insert(2020, 4.9);

        let encoded = serde_json::to_value(NormalizedPayload::Series(series)).unwrap();
        assert_eq!(encoded, json!({"values": {"2020": 4.9, "2022": 3.0}}));
    }

    #[test]
    fn test_pass_through_serializes_unchanged() {
        let doc = json!({"values": {"NGDP_RPCH": {"KOR": {"2020": -0.7}}}, "api": {"version": "1"}});
        let encoded = serde_json::to_value(NormalizedPayload::PassThrough(doc.clone())).unwrap();
        assert_eq!(encoded, doc);
    }
}
