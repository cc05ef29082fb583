//! Per-route permission guard.

pub mod context;
pub mod layer;

pub use context::{identity, remote_addr, request_context, Principal};
pub use layer::{RequirePermissionLayer, RequirePermissionMiddleware, ANONYMOUS};
