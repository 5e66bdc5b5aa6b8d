use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Request body posted to the completion gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub context: String,
}

/// Successful gateway response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub result: String,
}

/// Error gateway response, shared across every non-success status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure or unreadable body before any status was usable.
    Transport(String),
    /// The gateway answered with a non-success status; the message is its
    /// structured `error` field when present, otherwise generic.
    Upstream { status: u16, message: String },
    /// Success status with a body that is not the documented shape.
    Malformed(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Transport(message) => write!(f, "resolution failed: {message}"),
            GatewayError::Upstream { message, .. } => write!(f, "{message}"),
            GatewayError::Malformed(message) => {
                write!(f, "resolution failed: unexpected gateway response: {message}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

pub type GatewayFuture = Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send>>;

/// Seam between the trigger engine and whatever produces answers. The
/// engine only ever sees a context string going out and an answer string
/// (or error) coming back.
pub trait Gateway: Send + Sync {
    fn complete(&self, context: String) -> GatewayFuture;
}

/// Talks to the completion gateway over its JSON contract.
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    /// No explicit timeout: a resolution is bounded only by the underlying
    /// call, and failures surface as transport errors either way.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Gateway for HttpGateway {
    fn complete(&self, context: String) -> GatewayFuture {
        let client = self.client.clone();
        let url = self.url.clone();

        Box::pin(async move {
            let response = client
                .post(&url)
                .json(&CompleteRequest { context })
                .send()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            if status.is_success() {
                match serde_json::from_str::<CompleteResponse>(&body) {
                    Ok(ok) => Ok(ok.result),
                    Err(_) => Err(GatewayError::Malformed(body)),
                }
            } else {
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.error)
                    .unwrap_or_else(|_| {
                        format!("gateway returned status {}", status.as_u16())
                    });

                Err(GatewayError::Upstream {
                    status: status.as_u16(),
                    message,
                })
            }
        })
    }
}

/// Scripted gateway for tests and offline runs: pops queued outcomes in
/// order, falling back to a fixed answer, and records every context it was
/// asked to resolve.
#[cfg(any(test, feature = "mock_llm"))]
pub struct MockGateway {
    scripted: std::sync::Mutex<std::collections::VecDeque<Result<String, GatewayError>>>,
    fallback: String,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "mock_llm"))]
impl MockGateway {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            scripted: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: answer.into(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn push_outcome(&self, outcome: Result<String, GatewayError>) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    /// Every context window this gateway has been asked to resolve, in
    /// call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "mock_llm"))]
impl Gateway for MockGateway {
    fn complete(&self, context: String) -> GatewayFuture {
        self.requests.lock().unwrap().push(context);
        let outcome = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));

        Box::pin(async move { outcome })
    }
}
