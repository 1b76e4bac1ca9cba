//! Span constructors shared by the Warden crates.

use tracing::{info_span, Span};

/// Span covering the registration of one route pattern.
pub fn registration_span(pattern: &str, guard: &str) -> Span {
    info_span!("register", pattern = %pattern, guard = %guard)
}

/// Span covering one inbound HTTP request.
pub fn request_span(method: &str, path: &str) -> Span {
    info_span!("request", method = %method, path = %path)
}

