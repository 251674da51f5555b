// SPDX-License-Identifier: MIT

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::engine::InferenceEngine;
use crate::error::VerdictError;
use crate::value::Binding;

#[derive(Clone)]
struct AppState {
    engine: Arc<InferenceEngine>,
    request_timeout: Duration,
}

/// Build the HTTP router for a configuration
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        engine: Arc::new(InferenceEngine::new(config.engine.clone())),
        request_timeout: config.request_timeout,
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route("/infer", post(infer))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(config: ServerConfig) -> Result<(), VerdictError> {
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    log::info!("Endpoint: POST /infer");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct InferRequest {
    policy_dot: String,
    #[serde(default)]
    input: Map<String, Value>,
}

async fn infer(
    State(state): State<AppState>,
    payload: Result<Json<InferRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            log::warn!("Rejected request body: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            );
        }
    };

    let input = match Binding::from_json_map(&request.input) {
        Ok(input) => input,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // Traversal is CPU-bound and may not terminate; keep it off the runtime
    let engine = state.engine.clone();
    let policy = request.policy_dot;
    let task = tokio::task::spawn_blocking(move || engine.run(&policy, &input));

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(Ok(output))) => Json(json!({ "output": output })).into_response(),
        Ok(Ok(Err(e))) => {
            log::warn!("Inference failed: {}", e);
            error_response(status_for(&e), format!("Inference error: {}", e))
        }
        Ok(Err(join_error)) => {
            log::error!("Inference task failed: {}", join_error);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Inference task failed".to_string(),
            )
        }
        Err(_) => {
            log::warn!(
                "Inference exceeded request timeout of {:?}",
                state.request_timeout
            );
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Inference timed out".to_string(),
            )
        }
    }
}

fn status_for(err: &VerdictError) -> StatusCode {
    match err {
        VerdictError::StepLimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;

    #[test]
    fn test_status_mapping() {
        let policy: VerdictError = PolicyError::Malformed("x".into()).into();
        assert_eq!(status_for(&policy), StatusCode::BAD_REQUEST);

        let limit = VerdictError::StepLimitExceeded {
            limit: 1,
            node: "start".into(),
        };
        assert_eq!(status_for(&limit), StatusCode::UNPROCESSABLE_ENTITY);

        let other = VerdictError::other("boom");
        assert_eq!(status_for(&other), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
