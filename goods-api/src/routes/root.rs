//! Service banner

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    products: usize,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Product search API",
        products: state.search.catalog().len(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(root))
}
