use axum::{Router, routing::post};

use crate::{handlers, state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/complete",
            post(handlers::complete).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
