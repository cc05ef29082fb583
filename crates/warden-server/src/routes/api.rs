//! Protected API routes.

use crate::{
    error::{ApiError, ApiResult},
    middleware::{Principal, RequirePermissionLayer},
    state::AppState,
};
use axum::{
    extract::{rejection::PathRejection, Path},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;
use warden_authz::sanitize::{limits, sanitize};

/// Create the API router. Every route requires one permission.
pub fn router(state: AppState) -> Router<AppState> {
    let guard = |permission: &str, resource: &str| {
        RequirePermissionLayer::new(state.clone(), permission).with_resource(resource)
    };

    Router::new()
        .route(
            "/api/data",
            get(get_data).route_layer(guard("read", "get_data")),
        )
        .route(
            "/api/data",
            post(create_data).route_layer(guard("write", "create_data")),
        )
        .route(
            "/api/data/:data_id",
            delete(delete_data).route_layer(guard("delete", "delete_data")),
        )
        .route(
            "/api/admin",
            get(admin_endpoint).route_layer(guard("admin", "admin_endpoint")),
        )
}

async fn get_data(Principal(user): Principal) -> impl IntoResponse {
    info!(user = %sanitize(&user, limits::PRINCIPAL), "Data read");
    Json(json!({
        "data": "Sample data",
        "message": "Read successful"
    }))
}

async fn create_data(Principal(user): Principal) -> impl IntoResponse {
    info!(user = %sanitize(&user, limits::PRINCIPAL), "Data created");
    Json(json!({ "message": "Data created successfully" }))
}

/// A non-numeric id is answered like an unknown path.
async fn delete_data(
    Principal(user): Principal,
    data_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(data_id) = data_id.map_err(|_| ApiError::NotFound)?;
    info!(
        user = %sanitize(&user, limits::PRINCIPAL),
        data_id,
        "Data deleted"
    );
    Ok(Json(json!({
        "message": format!("Data {} deleted successfully", data_id)
    })))
}

async fn admin_endpoint(Principal(user): Principal) -> impl IntoResponse {
    info!(user = %sanitize(&user, limits::PRINCIPAL), "Admin access");
    Json(json!({ "message": "Admin access granted" }))
}
