//! Permission-checking middleware layer.

use super::context::{identity, request_context, Principal};
use crate::{
    error::ApiError,
    middleware::{forbidden::DenialAudited, logging::audit_headers},
    state::AppState,
};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::debug;
use warden_authz::{
    sanitize::{limits, sanitize},
    Decision, Denial, DenyReason,
};
use warden_common_log::spans::authz_span;

/// Logged in place of the principal when none was sent.
pub const ANONYMOUS: &str = "ANONYMOUS";

/// Layer requiring one permission for the wrapped handler.
#[derive(Clone)]
pub struct RequirePermissionLayer {
    state: AppState,
    permission: Arc<str>,
    resource: Option<Arc<str>>,
}

impl RequirePermissionLayer {
    /// Require `permission`, deciding with the engine in `state`.
    pub fn new(state: AppState, permission: impl Into<Arc<str>>) -> Self {
        Self {
            state,
            permission: permission.into(),
            resource: None,
        }
    }

    /// Name recorded as the audited resource. Defaults to the request path.
    pub fn with_resource(mut self, resource: impl Into<Arc<str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermissionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionMiddleware {
            inner,
            state: self.state.clone(),
            permission: self.permission.clone(),
            resource: self.resource.clone(),
        }
    }
}

/// Service produced by [`RequirePermissionLayer`].
#[derive(Clone)]
pub struct RequirePermissionMiddleware<S> {
    inner: S,
    state: AppState,
    permission: Arc<str>,
    resource: Option<Arc<str>>,
}

impl<S> RequirePermissionMiddleware<S> {
    /// Audit a denial and build the response for it.
    fn deny(&self, req: &Request<Body>, principal: Option<&str>, denial: &Denial) -> Response {
        let resource = self.resource.as_deref().unwrap_or(req.uri().path());

        let (logged_principal, extra) = match denial.reason {
            DenyReason::MissingIdentity => (
                Some(ANONYMOUS),
                json!({ "headers": audit_headers(req.headers()) }),
            ),
            DenyReason::UnknownPrincipal => (
                principal,
                json!({
                    "attempted_user_id": principal.map(|p| sanitize(p, limits::PRINCIPAL))
                }),
            ),
            DenyReason::InsufficientPermission => (principal, self.holder_context(principal)),
            DenyReason::Unhandled => (principal, Value::Null),
        };

        self.state.audit.record(
            denial,
            logged_principal,
            resource,
            &self.permission,
            &request_context(req),
            Some(&extra),
        );

        let mut response = ApiError::from_denial(denial, &self.permission).into_response();
        response.extensions_mut().insert(DenialAudited);
        response
    }

    /// Role and grants of a principal that was refused.
    fn holder_context(&self, principal: Option<&str>) -> Value {
        match principal.and_then(|p| self.state.store.lookup(p)) {
            Some(record) => json!({
                "user_role": record.role,
                "user_permissions": record.permissions,
            }),
            None => Value::Null,
        }
    }
}

impl<S> Service<Request<Body>> for RequirePermissionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let principal = identity(req.headers(), &self.state.identity_header);

        let span = authz_span(&self.permission);
        let _enter = span.enter();

        let decision = self.state.engine.decide(principal.as_deref(), &self.permission);
        debug!(
            allowed = decision.is_allowed(),
            reason = ?decision.reason(),
            "authorization decided"
        );

        match decision {
            Decision::Allow => {
                if let Some(principal) = principal {
                    req.extensions_mut().insert(Principal(principal));
                }
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Decision::Deny(denial) => {
                let response = self.deny(&req, principal.as_deref(), &denial);
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use axum::{body::to_bytes, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use warden_authz::{MemorySink, StaticPermissionStore};

    fn state() -> (AppState, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let state = AppState::with_parts(
            default_config().unwrap(),
            Arc::new(StaticPermissionStore::demo()),
            sink.clone(),
        )
        .unwrap();
        (state, sink)
    }

    fn app(state: AppState, permission: &str, calls: Arc<AtomicUsize>) -> Router {
        let handler = move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };
        Router::new().route(
            "/api/data",
            get(handler).route_layer(RequirePermissionLayer::new(state, permission)),
        )
    }

    fn request(user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/data");
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn details(sink: &MemorySink) -> Value {
        let infos = sink.infos();
        let json = infos[0].strip_prefix("403_ERROR_DETAILS: ").unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_allow_calls_handler_without_audit() {
        let (state, sink) = state();
        let calls = Arc::new(AtomicUsize::new(0));

        let response = app(state, "read", calls.clone())
            .oneshot(request(Some("user1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_deny_short_circuits() {
        let (state, sink) = state();
        let calls = Arc::new(AtomicUsize::new(0));

        let response = app(state, "write", calls.clone())
            .oneshot(request(Some("user3")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.extensions().get::<DenialAudited>().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.warnings().len(), 1);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Insufficient permissions. Required: write");
    }

    #[tokio::test]
    async fn test_missing_identity_context() {
        let (state, sink) = state();
        let req = Request::builder()
            .uri("/api/data")
            .header("authorization", "Bearer secret")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();

        app(state, "read", Arc::default()).oneshot(req).await.unwrap();

        let record = details(&sink);
        assert_eq!(record["user_id"], ANONYMOUS);
        assert_eq!(record["resource"], "/api/data");
        assert_eq!(record["extra_context"]["headers"]["authorization"], "[REDACTED]");
        assert_eq!(record["extra_context"]["headers"]["accept"], "application/json");
    }

    #[tokio::test]
    async fn test_unknown_principal_context() {
        let (state, sink) = state();
        app(state, "read", Arc::default())
            .oneshot(request(Some("mallory")))
            .await
            .unwrap();

        let record = details(&sink);
        assert_eq!(record["reason_code"], "unknown_principal");
        assert_eq!(record["extra_context"], json!({"attempted_user_id": "mallory"}));
    }

    #[tokio::test]
    async fn test_insufficient_permission_context() {
        let (state, sink) = state();
        let layer_state = state.clone();
        let router = Router::new().route(
            "/api/data",
            get(|| async { "ok" }).route_layer(
                RequirePermissionLayer::new(layer_state, "write").with_resource("create_data"),
            ),
        );
        router.oneshot(request(Some("user3"))).await.unwrap();

        let record = details(&sink);
        assert_eq!(record["resource"], "create_data");
        assert_eq!(
            record["extra_context"],
            json!({"user_role": "guest", "user_permissions": ["read"]})
        );
    }

    #[tokio::test]
    async fn test_decision_is_logged_inside_authz_span() {
        let logs = warden_common_log::capture::CapturedLogs::new();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let (state, _sink) = state();

        app(state, "write", Arc::default())
            .oneshot(request(Some("user3")))
            .await
            .unwrap();

        let lines = logs.lines_containing("authorization decided");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("allowed=false"));
        assert!(lines[0].contains("InsufficientPermission"));
        assert!(lines[0].contains("permission=write"));
    }

    #[tokio::test]
    async fn test_principal_reaches_handler() {
        let (state, _sink) = state();
        let router = Router::new().route(
            "/api/data",
            get(|Principal(who): Principal| async move { who })
                .route_layer(RequirePermissionLayer::new(state, "read")),
        );

        let response = router.oneshot(request(Some("user2"))).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"user2");
    }
}
