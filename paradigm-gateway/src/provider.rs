use std::env;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use paradigm_kernel::Config;

/// Instruction prompt sent with every completion request. The reply is
/// spliced verbatim into a user's document, so it has to be bare
/// replacement text.
const INSTRUCTION_PROMPT: &str = "The user text contains the marker @paradigm where a short \
factual answer belongs. Reply with only the replacement text for that marker: typically one to \
five words, no surrounding quotation marks, no explanatory prose.";

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("upstream credential misconfiguration: {0}")]
    Credentials(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("completion provider request failed: {0}")]
    Upstream(String),

    #[error("no usable answer produced")]
    NoAnswer,
}

pub type ProviderFuture = Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send>>;

/// Whatever turns a context window into a short answer.
pub trait Provider: Send + Sync {
    fn answer(&self, context: &str) -> ProviderFuture;
}

/// OpenAI-backed provider. A request first goes to the search-augmented
/// model; when that fails or produces nothing usable, one plain completion
/// attempt follows. Credential and quota failures are terminal, not
/// retried against the fallback.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_url: String,
    model: String,
    search_model: String,
}

impl OpenAiProvider {
    pub fn new(model: impl Into<String>, search_model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_url: OPENAI_CHAT_URL.to_string(),
            model: model.into(),
            search_model: search_model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upstream_model, &config.upstream_search_model)
    }
}

async fn completion_api_call(
    client: reqwest::Client,
    api_url: String,
    model: String,
    context: String,
) -> Result<String, ProviderError> {
    let token = env::var("OPENAI_API_KEY").map_err(|_| {
        ProviderError::Credentials("OPENAI_API_KEY environment variable not set".to_string())
    })?;

    let body = serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": INSTRUCTION_PROMPT },
            { "role": "user", "content": context },
        ],
    });

    let response = client
        .post(&api_url)
        .header("Authorization", format!("Bearer {}", token))
        .json(&body)
        .send()
        .await
        .map_err(|e| ProviderError::Upstream(e.to_string()))?;

    let status = response.status();
    let response_json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ProviderError::Upstream(e.to_string()))?;

    if !status.is_success() {
        let message = response_json["error"]["message"]
            .as_str()
            .unwrap_or("completion request failed")
            .to_string();

        return Err(match status.as_u16() {
            401 | 403 => ProviderError::Credentials(message),
            429 => ProviderError::RateLimited(format!(
                "Too many requests to the completion provider. {message}"
            )),
            _ => ProviderError::Upstream(message),
        });
    }

    let answer = response_json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string();

    if answer.is_empty() {
        Err(ProviderError::NoAnswer)
    } else {
        Ok(answer)
    }
}

impl Provider for OpenAiProvider {
    fn answer(&self, context: &str) -> ProviderFuture {
        let client = self.client.clone();
        let api_url = self.api_url.clone();
        let model = self.model.clone();
        let search_model = self.search_model.clone();
        let context = context.to_string();

        Box::pin(async move {
            match completion_api_call(
                client.clone(),
                api_url.clone(),
                search_model,
                context.clone(),
            )
            .await
            {
                Ok(answer) => Ok(answer),
                Err(err @ ProviderError::Credentials(_))
                | Err(err @ ProviderError::RateLimited(_)) => Err(err),
                Err(_) => completion_api_call(client, api_url, model, context).await,
            }
        })
    }
}

/// Fixed-outcome provider for handler tests and offline runs.
#[cfg(any(test, feature = "mock_llm"))]
pub struct StaticProvider {
    outcome: Result<String, ProviderError>,
}

#[cfg(any(test, feature = "mock_llm"))]
impl StaticProvider {
    pub fn ok(answer: impl Into<String>) -> Self {
        Self {
            outcome: Ok(answer.into()),
        }
    }

    pub fn err(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[cfg(any(test, feature = "mock_llm"))]
impl Provider for StaticProvider {
    fn answer(&self, _context: &str) -> ProviderFuture {
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}
