//! Role extraction from inbound requests.

use axum::{
    body::Body,
    http::{HeaderName, Request},
};
use std::marker::PhantomData;

/// Pulls the caller's role out of a request.
///
/// Returning `None` means the caller has no determinable identity and the
/// gate answers with its unauthorized responder.
pub trait RoleExtractor<R>: Send + Sync {
    /// Extract the role, if present.
    fn extract(&self, req: &Request<Body>) -> Option<R>;
}

impl<R, F> RoleExtractor<R> for F
where
    F: Fn(&Request<Body>) -> Option<R> + Send + Sync,
{
    fn extract(&self, req: &Request<Body>) -> Option<R> {
        self(req)
    }
}

/// Reads the role from a request header.
///
/// As a token extractor the header value is used verbatim. As a flag
/// extractor it is parsed as a decimal or `0x`-prefixed hex `u64`.
#[derive(Debug, Clone)]
pub struct HeaderRoleExtractor {
    header: HeaderName,
}

impl HeaderRoleExtractor {
    /// Extractor reading the given header.
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    fn value<'r>(&self, req: &'r Request<Body>) -> Option<&'r str> {
        req.headers()
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

impl Default for HeaderRoleExtractor {
    fn default() -> Self {
        Self::new(HeaderName::from_static("x-role"))
    }
}

impl RoleExtractor<String> for HeaderRoleExtractor {
    fn extract(&self, req: &Request<Body>) -> Option<String> {
        self.value(req).map(String::from)
    }
}

impl RoleExtractor<u64> for HeaderRoleExtractor {
    fn extract(&self, req: &Request<Body>) -> Option<u64> {
        parse_flags(self.value(req)?)
    }
}

fn parse_flags(value: &str) -> Option<u64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Reads a typed role that an upstream layer stored in the request extensions.
pub struct ExtensionRoleExtractor<R> {
    _role: PhantomData<fn() -> R>,
}

impl<R> ExtensionRoleExtractor<R> {
    /// Extractor for roles of type `R`.
    pub fn new() -> Self {
        Self { _role: PhantomData }
    }
}

impl<R> Default for ExtensionRoleExtractor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ExtensionRoleExtractor<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R> RoleExtractor<R> for ExtensionRoleExtractor<R>
where
    R: Clone + Send + Sync + 'static,
{
    fn extract(&self, req: &Request<Body>) -> Option<R> {
        req.extensions().get::<R>().cloned()
    }
}
