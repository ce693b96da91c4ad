//! HTTP surface of the proxy.
//!
//! Every method is routed to the [`RequestHandler`] so that pre-flight and
//! 405 answers carry the same headers as data responses.

use crate::core::config::AppConfig;
use crate::core::fetch::FetchExecutor;
use crate::core::handler::{RequestHandler, ResponseEnvelope};
use crate::providers::ProviderKind;
use crate::providers::http::ReqwestExecutor;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    imf: Arc<RequestHandler>,
    world_bank: Arc<RequestHandler>,
}

impl AppState {
    pub fn new(config: &AppConfig, executor: Arc<dyn FetchExecutor>) -> Self {
        let handler = |kind: ProviderKind| {
            Arc::new(RequestHandler::new(
                kind.adapter(&config.providers),
                Arc::clone(&executor),
                config.timeout(),
            ))
        };
        AppState {
            imf: handler(ProviderKind::Imf),
            world_bank: handler(ProviderKind::WorldBank),
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid response header"),
            }
        }
        response
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/imf", any(imf_proxy))
        .route("/.netlify/functions/imf-proxy", any(imf_proxy))
        .route("/api/worldbank", any(world_bank_proxy))
        .route("/.netlify/functions/worldbank-proxy", any(world_bank_proxy))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn imf_proxy(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
) -> ResponseEnvelope {
    state.imf.handle(&method, &query).await
}

async fn world_bank_proxy(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
) -> ResponseEnvelope {
    state.world_bank.handle(&method, &query).await
}

/// Runs the proxy until Ctrl-C.
pub async fn serve(config: &AppConfig, bind: Option<SocketAddr>) -> Result<()> {
    let addr = bind.unwrap_or(config.server.bind);
    let executor: Arc<dyn FetchExecutor> = Arc::new(ReqwestExecutor::new()?);
    let app = build_router(AppState::new(config, executor));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
