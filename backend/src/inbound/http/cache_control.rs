//! Cache-control policy for API responses.

use actix_web::http::header::CACHE_CONTROL;
use actix_web::middleware::DefaultHeaders;

/// Signup responses are per-request and must never be stored.
pub const NO_STORE: &str = "no-store";

/// Middleware stamping [`NO_STORE`] on every response in a scope.
pub fn no_store_headers() -> DefaultHeaders {
    DefaultHeaders::new().add((CACHE_CONTROL, NO_STORE))
}
