pub mod error;
pub mod handlers;
pub mod provider;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use provider::{OpenAiProvider, Provider, ProviderError};
pub use routes::router;
pub use state::AppState;

pub async fn serve(addr: &str, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    eprintln!("completion gateway listening on {}", listener.local_addr()?);
    serve_listener(listener, state).await
}

/// Serve on an already-bound listener (lets callers bind port 0 first).
pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}
