//! Route configuration for the Warden HTTP server.

mod api;

use crate::{
    error::ApiError,
    middleware::{ForbiddenAuditLayer, LoggingLayer, RequestLogConfig},
    state::AppState,
};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Common middleware stack applied to all routes
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let router = Router::new()
        .merge(api::router(state.clone()))
        // Fallback for unmatched routes
        .fallback(fallback_handler)
        // Audit any 403 the guards did not produce
        .layer(ForbiddenAuditLayer::new(state.clone()));

    let router = if config.logging.log_requests {
        router.layer(LoggingLayer::with_config(RequestLogConfig {
            exclude_paths: config.logging.exclude_paths.clone(),
        }))
    } else {
        router
    };

    router.layer(common_middleware).with_state(state)
}

async fn fallback_handler() -> ApiError {
    ApiError::NotFound
}
