//! The gateway's HTTP contract as the editor's client actually sees it:
//! statuses and error bodies observed through a real socket.

use crate::fixtures::*;

async fn complete_via(provider: StaticProvider, context: &str) -> TestResult<Result<String, GatewayError>> {
    let url = start_gateway(provider).await?;
    let gateway = HttpGateway::new(url);
    Ok(gateway.complete(context.to_string()).await)
}

#[tokio::test]
async fn test_success_returns_bare_answer() -> TestResult {
    let outcome = complete_via(StaticProvider::ok("1946"), "founded in @paradigm").await?;
    assert_eq!(outcome.unwrap(), "1946");
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_surfaces_status_and_message_verbatim() -> TestResult {
    let message = "Too many requests. Please try again later.";
    let outcome = complete_via(
        StaticProvider::err(ProviderError::RateLimited(message.to_string())),
        "when? @paradigm",
    )
    .await?;

    assert_eq!(
        outcome.unwrap_err(),
        GatewayError::Upstream {
            status: 429,
            message: message.to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_credential_failure_is_401() -> TestResult {
    let outcome = complete_via(
        StaticProvider::err(ProviderError::Credentials("key not set".to_string())),
        "x @paradigm",
    )
    .await?;

    match outcome.unwrap_err() {
        GatewayError::Upstream { status: 401, .. } => Ok(()),
        other => Err(format!("expected 401, got {other:?}").into()),
    }
}

#[tokio::test]
async fn test_no_answer_is_500() -> TestResult {
    let outcome = complete_via(StaticProvider::err(ProviderError::NoAnswer), "x @paradigm").await?;

    match outcome.unwrap_err() {
        GatewayError::Upstream { status: 500, .. } => Ok(()),
        other => Err(format!("expected 500, got {other:?}").into()),
    }
}

#[tokio::test]
async fn test_empty_context_is_rejected_with_400() -> TestResult {
    let outcome = complete_via(StaticProvider::ok("unused"), "   ").await?;

    match outcome.unwrap_err() {
        GatewayError::Upstream { status: 400, message } => {
            assert!(message.contains("context"), "got: {message}");
            Ok(())
        }
        other => Err(format!("expected 400, got {other:?}").into()),
    }
}
