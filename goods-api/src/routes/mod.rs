//! API route definitions

mod chat;
mod health;
mod root;

use axum::Router;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(root::routes())
        .merge(chat::routes())
        .merge(health::routes())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use goods_catalog::Catalog;
    use goods_core::{GoodsResult, ProductRecord};
    use goods_embedding::{
        EmbeddingIndex, HashingEmbedder, ProductStore, StoredMatch, StoredProduct,
    };
    use goods_llm::{LanguageService, QueryInterpreter};
    use goods_services::{SearchService, ERROR_MESSAGE, NOT_UNDERSTOOD_MESSAGE};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    struct FixedReply(&'static str);

    #[async_trait]
    impl LanguageService for FixedReply {
        async fn complete(&self, _system: &str, _user: &str) -> GoodsResult<String> {
            Ok(self.0.to_string())
        }
    }

    /// Store whose lookups always fail
    struct BrokenStore;

    impl ProductStore for BrokenStore {
        fn upsert_record(&self, _product: &StoredProduct) -> goods_embedding::Result<()> {
            Ok(())
        }

        fn nearest_k(&self, _query: &[f32], _k: usize) -> goods_embedding::Result<Vec<StoredMatch>> {
            Err(goods_embedding::EmbeddingError::Database("disk I/O error".to_string()))
        }
    }

    fn record(title: &str, tags: &[&str], price: f64) -> ProductRecord {
        ProductRecord {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: String::new(),
            cleaned_description: title.to_string(),
            normalized_description: title.to_lowercase(),
            vendor: "Acme".to_string(),
            product_type: "soap".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            price: Some(price),
            entities: Vec::new(),
        }
    }

    async fn app(reply: &'static str, store: Option<Arc<dyn ProductStore>>) -> Router {
        let catalog = Arc::new(Catalog::from_records(vec![
            record("Lavender Soap", &["eco"], 9.5),
            record("Plain Soap", &["basic"], 4.0),
        ]));
        let embedder = Arc::new(HashingEmbedder::default());
        let index = EmbeddingIndex::build(&catalog.normalized_descriptions(), embedder.as_ref())
            .await
            .unwrap();

        let mut search = SearchService::new(
            catalog,
            QueryInterpreter::new(Arc::new(FixedReply(reply))),
            embedder,
            Arc::new(index),
        );
        if let Some(store) = store {
            search = search.with_store(store);
        }

        api_routes().with_state(AppState {
            search: Arc::new(search),
        })
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_root_reports_catalog_size() {
        let (status, body) = send(app("", None).await, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"], 2);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_chat_attribute_search() {
        let app = app("Attributes: eco", None).await;
        let (status, body) = send(app, Method::POST, "/chat/", Some(json!({"query": "eco soap"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Lavender Soap, Price: 9.50"}));
    }

    #[tokio::test]
    async fn test_chat_without_trailing_slash() {
        let app = app("Minimum price: 1", None).await;
        let (status, body) = send(app, Method::POST, "/chat", Some(json!({"query": "soap"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            "Plain Soap, Price: 4.00\nLavender Soap, Price: 9.50"
        );
    }

    #[tokio::test]
    async fn test_chat_vector_mode() {
        let app = app("Attributes: plain, soap", None).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/chat/",
            Some(json!({"query": "plain soap", "mode": "vector"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response = body["response"].as_str().unwrap();
        assert!(response.starts_with("Plain Soap, Price: 4.00"));
    }

    #[tokio::test]
    async fn test_chat_vector_failure_is_500() {
        let app = app("Attributes: soap", Some(Arc::new(BrokenStore))).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/chat/",
            Some(json!({"query": "soap", "mode": "vector"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["response"], ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_blank_query() {
        let app = app("Attributes: eco", None).await;
        let (status, body) = send(app, Method::POST, "/chat/", Some(json!({"query": "   "}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], NOT_UNDERSTOOD_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_body() {
        let app = app("", None).await;
        let (status, body) = send(app, Method::POST, "/chat/", Some(json!({"text": "soap"}))).await;
        assert!(status.is_client_error());
        assert_eq!(body["response"], ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_answers_invalid_json_with_json() {
        let app = app("", None).await;
        let request = Request::post("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"query\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["response"], ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app("", None).await, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["vector_store"], false);

        let response = app("", None)
            .await
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
