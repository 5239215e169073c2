use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Frontend origins are not pinned; the gateway in front of this service
/// handles origin policy. Methods are limited to the verbs the API serves.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any)
}
