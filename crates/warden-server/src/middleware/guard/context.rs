//! Request facts the guard and the audit trail need.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderName, Request},
};
use std::net::SocketAddr;
use warden_authz::RequestContext;

/// Recorded when no client address can be determined.
pub const UNKNOWN_ADDR: &str = "unknown";

/// The authorized caller, inserted by the guard on allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::AuthenticationRequired)
    }
}

/// Caller identity from `header`, decoded lossily.
///
/// An empty value is returned as-is; the engine treats it as missing.
pub fn identity(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
    headers
        .get(header)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Client address: socket peer, then `X-Forwarded-For`, then `X-Real-IP`.
pub fn remote_addr<B>(req: &Request<B>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    let headers = req.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| UNKNOWN_ADDR.to_string())
}

/// Request metadata for an audit record. Values are raw; the audit logger
/// sanitizes them.
pub fn request_context<B>(req: &Request<B>) -> RequestContext {
    let mut context = RequestContext::new(
        req.method().as_str(),
        req.uri().path(),
        remote_addr(req),
    );
    if let Some(agent) = req.headers().get(header::USER_AGENT) {
        context = context.with_user_agent(String::from_utf8_lossy(agent.as_bytes()));
    }
    context
}
