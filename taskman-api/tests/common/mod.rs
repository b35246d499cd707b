/// Common test utilities for API integration tests
///
/// The router is driven in-process against a fresh `MemoryStore` per test,
/// so no database or network is needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use taskman_api::app::{build_router, AppState};
use taskman_api::config::Config;
use taskman_shared::store::memory::MemoryStore;
use tower::ServiceExt;

/// Test context holding the router and a handle on its store
pub struct TestContext {
    pub app: Router,
    pub store: MemoryStore,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(store.clone().into(), Config::in_memory());

        TestContext {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// An empty body comes back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).unwrap()).await
    }

    /// Sends a raw body with a JSON content type
    pub async fn send_raw(&self, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();

        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Response was not JSON: {}", String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }
}
