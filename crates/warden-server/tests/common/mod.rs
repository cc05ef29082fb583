//! Shared harness for server integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use warden_authz::{MemorySink, StaticPermissionStore};
use warden_server::{config::default_config, routes::create_router, AppState};

/// Router over the demo principals, auditing into memory.
pub struct TestApp {
    pub router: Router,
    pub sink: Arc<MemorySink>,
}

impl TestApp {
    pub fn new() -> Self {
        let sink = Arc::new(MemorySink::new());
        let mut config = default_config().expect("embedded defaults load");
        config.logging.log_requests = false;

        let state = AppState::with_parts(
            config,
            Arc::new(StaticPermissionStore::demo()),
            sink.clone(),
        )
        .expect("state builds");

        Self {
            router: create_router(state),
            sink,
        }
    }

    /// Send one request and collect status and JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Parsed `403_ERROR_DETAILS` records, in order.
    pub fn details(&self) -> Vec<Value> {
        self.sink
            .infos()
            .iter()
            .filter_map(|line| line.strip_prefix("403_ERROR_DETAILS: "))
            .map(|json| serde_json::from_str(json).expect("details line is JSON"))
            .collect()
    }
}

/// Build a request, optionally identified.
pub fn request(method: &str, uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::empty()).expect("valid request")
}
