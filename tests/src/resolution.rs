//! Full-path resolution: trigger engine talking to a live gateway server
//! over HTTP, splicing real responses back into the document.

use crate::fixtures::*;

#[tokio::test]
async fn test_trigger_resolves_over_http() -> TestResult {
    let mut engine = engine_against(StaticProvider::ok("1946")).await?;

    let fresh = engine.on_text_changed("Sony was founded in @paradigm.");
    assert_eq!(fresh.len(), 1);

    let resolution = engine.begin(fresh[0].clone(), Some(30)).await;
    let applied = engine.apply(resolution);

    assert!(applied.spliced);
    assert_eq!(engine.text(), "Sony was founded in 1946.");
    assert_eq!(applied.caret, Some(25));
    Ok(())
}

#[tokio::test]
async fn test_multiple_triggers_resolve_back_to_front() -> TestResult {
    let mut engine = engine_against(StaticProvider::ok("1946")).await?;

    let mut fresh = engine.on_text_changed("a @paradigm b @paradigm c");
    assert_eq!(fresh.len(), 2);

    // resolving the later offset first leaves the earlier span untouched
    while let Some(occurrence) = fresh.pop() {
        let resolution = engine.begin(occurrence, None).await;
        assert!(engine.apply(resolution).spliced);
    }

    assert_eq!(engine.text(), "a 1946 b 1946 c");
    Ok(())
}

#[tokio::test]
async fn test_uppercase_token_resolves() -> TestResult {
    let mut engine = engine_against(StaticProvider::ok("1946")).await?;

    let fresh = engine.on_text_changed("founded in @PARADIGM.");
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].matched, "@PARADIGM");

    let resolution = engine.begin(fresh[0].clone(), None).await;
    assert!(engine.apply(resolution).spliced);
    assert_eq!(engine.text(), "founded in 1946.");
    Ok(())
}

#[tokio::test]
async fn test_multibyte_document_splices_at_character_offsets() -> TestResult {
    let mut engine = engine_against(StaticProvider::ok("answer ✓")).await?;

    let fresh = engine.on_text_changed("héllo wörld @paradigm — done");
    assert_eq!(fresh[0].position, 12);

    let resolution = engine.begin(fresh[0].clone(), Some(21)).await;
    let applied = engine.apply(resolution);

    assert!(applied.spliced);
    assert_eq!(engine.text(), "héllo wörld answer ✓ — done");
    // caret sat at the span end and follows the replacement's end
    assert_eq!(applied.caret, Some(20));
    Ok(())
}

#[tokio::test]
async fn test_document_unchanged_when_gateway_is_down() -> TestResult {
    // nothing listens on this port once the listener is dropped
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/complete", listener.local_addr()?);
    drop(listener);

    let gateway = Arc::new(HttpGateway::new(url));
    let mut engine = TriggerEngine::new(gateway, WINDOW_RADIUS);

    let fresh = engine.on_text_changed("ask @paradigm now");
    let before = engine.text().to_string();

    let resolution = engine.begin(fresh[0].clone(), None).await;
    let applied = engine.apply(resolution);

    assert!(!applied.spliced);
    assert_eq!(engine.text(), before);
    let error = engine.session().last_error().unwrap_or_default().to_string();
    assert!(error.starts_with("resolution failed:"), "got: {error}");
    Ok(())
}
