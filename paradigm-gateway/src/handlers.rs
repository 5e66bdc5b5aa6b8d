use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /complete`: validate the context, hand it to the provider, and
/// answer `{"result": <string>}`.
///
/// The body is taken as loose JSON rather than a typed struct so a present
/// but non-string `context` fails validation here (400) instead of as a
/// deserializer artifact.
pub async fn complete(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = payload.map_err(|_| ApiError::MissingContext)?;

    let context = body
        .get("context")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingContext)?;

    let answer = state.provider.answer(context).await?;
    Ok(Json(json!({ "result": answer })))
}

/// Anything but POST on `/complete` still gets the contract's JSON error
/// body; axum's default 405 would answer with an empty one.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
