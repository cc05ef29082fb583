//! Middleware for the Warden HTTP server.

pub mod forbidden;
pub mod guard;
pub mod logging;

pub use forbidden::{DenialAudited, ForbiddenAuditLayer, ForbiddenAuditMiddleware};
pub use guard::{Principal, RequirePermissionLayer, RequirePermissionMiddleware};
pub use logging::{LoggingLayer, LoggingMiddleware, RequestLogConfig};
