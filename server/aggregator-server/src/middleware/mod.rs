//! Middleware and extractors for request processing

pub mod auth_context;
pub mod cors;
pub mod db_guard;
pub mod extractors;
pub mod request_context;

pub use auth_context::AuthContext;
pub use cors::create_cors_layer;
pub use db_guard::db_guard_middleware;
pub use extractors::{AppJson, AppPath, AppQuery};
pub use request_context::{
    request_context_middleware, RequestContext, CONTEXT_ID_HEADER, REQUEST_ID_HEADER,
    TRACE_ID_HEADER,
};
