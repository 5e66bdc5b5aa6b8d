#![allow(dead_code, unused_imports)]

pub(crate) use serde_json::{Value, json};
pub(crate) use std::sync::Arc;
pub(crate) use std::time::Duration;

pub(crate) use paradigm_core::engine::TriggerEngine;
pub(crate) use paradigm_core::gateway::{Gateway, GatewayError, HttpGateway};
pub(crate) use paradigm_gateway::provider::{ProviderError, StaticProvider};
pub(crate) use paradigm_gateway::{AppState, serve_listener};
pub(crate) use paradigm_kernel::window::WINDOW_RADIUS;

pub(crate) type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Bind an ephemeral port, serve the gateway on it, and hand back the
/// `/complete` endpoint URL. The server task dies with the test runtime.
pub(crate) async fn start_gateway(provider: StaticProvider) -> TestResult<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(Arc::new(provider));

    tokio::spawn(async move {
        let _ = serve_listener(listener, state).await;
    });

    Ok(format!("http://{addr}/complete"))
}

/// Trigger engine wired to a live gateway over real HTTP.
pub(crate) async fn engine_against(provider: StaticProvider) -> TestResult<TriggerEngine> {
    let url = start_gateway(provider).await?;
    let gateway = Arc::new(HttpGateway::new(url));
    Ok(TriggerEngine::new(gateway, WINDOW_RADIUS))
}
