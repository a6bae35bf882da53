use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::resolver::{ReplyResolver, ASSISTANT_NAME};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ReplyResolver>,
}

impl AppState {
    pub fn new(resolver: ReplyResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(|| async { "OK" }))
        .route("/chat", post(chat))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ChatReq {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl ChatReq {
    /// Lenient body parsing: anything unusable becomes an empty message.
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn message(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResp {
    pub assistant_name: String,
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
    assistant: &'static str,
}

async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        assistant: ASSISTANT_NAME,
    })
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResp> {
    let req = ChatReq::from_body(&body);
    let reply = state.resolver.resolve(req.message()).await;
    Json(ChatResp {
        assistant_name: ASSISTANT_NAME.to_string(),
        reply,
    })
}
