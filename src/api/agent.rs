//! Agent reply endpoint used by the browser call page

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::conversation::Turn;

/// Build agent router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/agent", post(agent_reply))
        .with_state(state)
}

/// Caller utterance with the conversation so far
#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub message: String,
    pub history: Vec<Turn>,
}

/// Agent reply
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub response: String,
    /// Reserved for server-side speech; the page synthesizes locally
    pub audio: Option<String>,
}

/// Resolve a reply for the caller's latest utterance
async fn agent_reply(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, AgentError> {
    let Json(request) = payload.map_err(|e| {
        tracing::error!(error = %e, "invalid agent request");
        AgentError::Internal
    })?;

    let reply = state
        .resolver
        .resolve_reply(&request.message, &request.history)
        .await;

    tracing::debug!(
        source = ?reply.source,
        turns = request.history.len(),
        "resolved agent reply"
    );

    Ok(Json(AgentResponse {
        response: reply.text,
        audio: None,
    }))
}

/// Agent API errors
#[derive(Debug)]
pub enum AgentError {
    /// Request could not be processed
    Internal,
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        match self {
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to process request",
                }),
            )
                .into_response(),
        }
    }
}
