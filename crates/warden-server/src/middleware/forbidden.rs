//! Catch-all audit for 403 responses the guard did not produce.

use super::guard::context::{identity, request_context};
use crate::{error::ApiError, state::AppState};
use axum::{
    body::Body,
    extract::Request,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use futures::future::BoxFuture;
use serde_json::json;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use warden_authz::Denial;

/// Response extension marking a 403 whose denial is already audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenialAudited;

/// Reason recorded for 403s raised outside the guard.
pub const UNHANDLED_REASON: &str = "Generic 403 error - not caught by specific handler";

/// Principal, resource or permission that could not be determined.
pub const UNKNOWN: &str = "UNKNOWN";

/// Audits unmarked 403 responses and replaces their body.
#[derive(Clone)]
pub struct ForbiddenAuditLayer {
    state: AppState,
}

impl ForbiddenAuditLayer {
    /// Audit through the logger in `state`.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for ForbiddenAuditLayer {
    type Service = ForbiddenAuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ForbiddenAuditMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Service produced by [`ForbiddenAuditLayer`].
#[derive(Clone)]
pub struct ForbiddenAuditMiddleware<S> {
    inner: S,
    state: AppState,
}

impl<S> Service<Request> for ForbiddenAuditMiddleware<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let state = self.state.clone();
        let mut inner = self.inner.clone();

        let principal = identity(req.headers(), &state.identity_header)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let context = request_context(&req);

        Box::pin(async move {
            let response = inner.call(req).await?;

            if response.status() != StatusCode::FORBIDDEN
                || response.extensions().get::<DenialAudited>().is_some()
            {
                return Ok(response);
            }

            state.audit.record(
                &Denial::unhandled(UNHANDLED_REASON),
                Some(principal.as_str()),
                &context.path,
                UNKNOWN,
                &context,
                Some(&json!({ "error": response.status().to_string() })),
            );

            let mut response = ApiError::Forbidden.into_response();
            response.extensions_mut().insert(DenialAudited);
            Ok(response)
        })
    }
}
