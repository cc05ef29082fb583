//! Request logging layer.

use crate::middleware::guard::context::remote_addr;
use axum::{body::Body, extract::Request, http::Response};
use futures::future::BoxFuture;
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::{info, Instrument};
use uuid::Uuid;
use warden_authz::sanitize::{limits, sanitize};
use warden_common_log::spans::request_span;

const REQUEST_ID: &str = "x-request-id";

/// Request logging layer.
#[derive(Clone, Default)]
pub struct LoggingLayer {
    config: RequestLogConfig,
}

/// What the request logging layer skips.
#[derive(Clone, Debug, Default)]
pub struct RequestLogConfig {
    /// Path prefixes to exclude from logging.
    pub exclude_paths: Vec<String>,
}

impl LoggingLayer {
    /// Log every path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log with explicit exclusions.
    pub fn with_config(config: RequestLogConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
    config: RequestLogConfig,
}

impl<S> Service<Request> for LoggingMiddleware<S>
where
    S: Service<Request, Response = Response<Body>, Error = std::convert::Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = req.uri().path();
            if config.exclude_paths.iter().any(|p| path.starts_with(p.as_str())) {
                return inner.call(req).await;
            }

            // Request data is caller-controlled; sanitize before it reaches a log line.
            let method = sanitize(req.method().as_str(), limits::METHOD);
            let path = sanitize(path, limits::PATH);
            let client_ip = sanitize(&remote_addr(&req), limits::REMOTE_ADDR);
            let request_id = req
                .headers()
                .get(REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .map(|v| sanitize(v, limits::PRINCIPAL))
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let user_agent = req
                .headers()
                .get(axum::http::header::USER_AGENT)
                .map(|v| sanitize(&String::from_utf8_lossy(v.as_bytes()), limits::USER_AGENT))
                .unwrap_or_default();
            let version = req.version();

            let span = request_span(&request_id, &method, &path, &client_ip);

            async move {
                let start = Instant::now();

                info!(
                    event = "request_started",
                    version = ?version,
                    user_agent = %user_agent,
                );

                let response = inner.call(req).await?;

                info!(
                    event = "request_completed",
                    status = response.status().as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                );

                Ok::<_, S::Error>(response)
            }
            .instrument(span)
            .await
        })
    }
}
