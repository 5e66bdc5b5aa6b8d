use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use paradigm_core::{
    config,
    display::{self, Status},
    editor::run_editor,
    engine::TriggerEngine,
    gateway::HttpGateway,
};
use paradigm_gateway::{AppState, OpenAiProvider, serve};

pub async fn edit(file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::get_config();

    let content = match &file {
        Some(path) if path.exists() => std::fs::read_to_string(path)?,
        _ => String::new(),
    };

    let gateway = Arc::new(HttpGateway::new(cfg.gateway_url.clone()));
    let document = run_editor(
        &content,
        gateway,
        cfg.window_radius,
        Duration::from_millis(cfg.quiet_period_ms),
    )
    .await?;

    match (document, file) {
        (Some(document), Some(path)) => {
            std::fs::write(&path, document)?;
            eprintln!("Saved {}", path.display());
        }
        (Some(document), None) => {
            print!("{document}");
        }
        (None, _) => {
            eprintln!("Discarded.");
        }
    }

    Ok(())
}

/// One-shot resolution: scan the text, resolve every complete trigger back
/// to front so earlier offsets stay valid, and print the final document.
pub async fn resolve(text: String) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::get_config();
    let gateway = Arc::new(HttpGateway::new(cfg.gateway_url.clone()));
    let window_radius = cfg.window_radius;

    let resolved = display::call_with_status(move |tx| async move {
        let mut engine = TriggerEngine::new(gateway, window_radius);
        let mut pending = engine.on_text_changed(&text);

        let total = pending.len();
        let mut done = 0usize;
        let mut failures: Vec<String> = Vec::new();
        while let Some(occurrence) = pending.pop() {
            done += 1;
            let _ = tx
                .send(Status::Working(format!("Resolving trigger {done}/{total}...")))
                .await;

            let resolution = engine.begin(occurrence, None).await;
            let applied = engine.apply(resolution);

            // a later success clears the session error, so record it now
            if !applied.spliced
                && let Some(error) = engine.session().last_error()
            {
                failures.push(error.to_string());
            }
        }

        if !failures.is_empty() {
            return Err(failures.join("; ").into());
        }

        Ok(engine.text().to_string())
    })
    .await
    // call_with_status deals in Send + Sync errors; coerce to the local type
    .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    println!("{resolved}");
    Ok(())
}

pub async fn gateway(bind: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::get_config();
    let addr = bind.unwrap_or_else(|| cfg.bind_addr.clone());

    let provider = Arc::new(OpenAiProvider::from_config(&cfg));
    serve(&addr, AppState::new(provider)).await
}
