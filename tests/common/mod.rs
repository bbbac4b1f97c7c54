//! Shared test utilities

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::post};
use call_agent::api::{self, ApiState};
use call_agent::config::file::ConfigFile;
use call_agent::{Config, LocalClassifier, ReplyResolver};
use serde_json::Value;
use tokio::net::TcpListener;

/// Router backed by a classifier-only resolver
#[must_use]
pub fn local_router() -> Router {
    let resolver = ReplyResolver::local(LocalClassifier::builtin());
    api::router(Arc::new(ApiState::new(resolver)))
}

/// Configuration pointing the remote path at `base_url` with a test key
#[must_use]
pub fn remote_config(base_url: &str) -> Config {
    let base_url = base_url.to_string();
    Config::from_sources(ConfigFile::default(), move |key: &str| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "CALL_AGENT_COMPLETION_URL" => Some(base_url.clone()),
        "CALL_AGENT_TIMEOUT_SECS" => Some("2".to_string()),
        _ => None,
    })
}

/// Start a stand-in completion service answering every request with `status` and `body`
///
/// Returns the base URL to configure.
pub async fn spawn_upstream(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind upstream");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream failed");
    });

    format!("http://{addr}/v1")
}
