//! Chat endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use goods_services::{ERROR_MESSAGE, NOT_UNDERSTOOD_MESSAGE};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::AppState;

/// Which search path answers the query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Tag/type matching on the interpreted attributes, cheapest first
    #[default]
    Attributes,
    /// Nearest-neighbor lookup on the interpreted attributes
    Vector,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    query: String,
    #[serde(default)]
    mode: SearchMode,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    response: String,
}

impl ChatResponse {
    fn new(response: impl Into<String>) -> Json<Self> {
        Json(Self {
            response: response.into(),
        })
    }
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    // Bad bodies still get the JSON reply shape
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            return (rejection.status(), ChatResponse::new(ERROR_MESSAGE));
        }
    };

    info!("Chat query ({:?}): {}", request.mode, request.query);

    if request.query.trim().is_empty() {
        return (StatusCode::OK, ChatResponse::new(NOT_UNDERSTOOD_MESSAGE));
    }

    match request.mode {
        SearchMode::Attributes => {
            let response = state.search.respond(&request.query).await;
            (StatusCode::OK, ChatResponse::new(response))
        }
        SearchMode::Vector => match state.search.respond_vector(&request.query).await {
            Ok(response) => (StatusCode::OK, ChatResponse::new(response)),
            Err(e) => {
                error!("Vector search failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ChatResponse::new(ERROR_MESSAGE),
                )
            }
        },
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/", post(chat))
}
