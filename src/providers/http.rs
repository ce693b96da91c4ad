use crate::core::fetch::{FetchError, FetchExecutor, UpstreamResponse};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// [`FetchExecutor`] backed by a shared `reqwest::Client`.
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("macroproxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ReqwestExecutor { client })
    }

    async fn send(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}

fn error_code(err: &reqwest::Error) -> &'static str {
    if err.is_connect() {
        "connect"
    } else if err.is_redirect() {
        "redirect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else if err.is_request() || err.is_builder() {
        "request"
    } else {
        "unknown"
    }
}

#[async_trait]
impl FetchExecutor for ReqwestExecutor {
    #[instrument(name = "UpstreamFetch", skip(self, headers), fields(url = %url))]
    async fn execute(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<UpstreamResponse, FetchError> {
        // Dropping the future on expiry aborts the in-flight request.
        match tokio::time::timeout(timeout, self.send(url, headers)).await {
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Upstream request timed out");
                Err(FetchError::Timeout(timeout))
            }
            Ok(Err(e)) if e.is_timeout() => Err(FetchError::Timeout(timeout)),
            Ok(Err(e)) => {
                warn!(error = %e, "Upstream request failed");
                Err(FetchError::Transport {
                    message: e.to_string(),
                    code: Some(error_code(&e).to_string()),
                })
            }
            Ok(Ok(response)) => {
                debug!(status = response.status, "Received upstream response");
                Ok(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn accept_json() -> BTreeMap<String, String> {
        BTreeMap::from([("Accept".to_string(), "application/json".to_string())])
    }

    #[tokio::test]
    async fn test_returns_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let executor = ReqwestExecutor::new().unwrap();
        let response = executor
            .execute(
                &format!("{}/data", mock_server.uri()),
                &accept_json(),
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_non_2xx_is_not_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let executor = ReqwestExecutor::new().unwrap();
        let response = executor
            .execute(&mock_server.uri(), &accept_json(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.body, "maintenance");
    }

    #[tokio::test]
    async fn test_timeout_aborts_without_retry() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(1_000)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let executor = ReqwestExecutor::new().unwrap();
        let result = executor
            .execute(&mock_server.uri(), &accept_json(), Duration::from_millis(100))
            .await;
        assert_eq!(result, Err(FetchError::Timeout(Duration::from_millis(100))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let executor = ReqwestExecutor::new().unwrap();
        let result = executor
            .execute(&format!("http://{addr}/"), &accept_json(), Duration::from_secs(5))
            .await;
        match result {
            Err(FetchError::Transport { code, .. }) => assert_eq!(code.as_deref(), Some("connect")),
            other => panic!("Expected transport error, got {other:?}"),
        }
    }
}
