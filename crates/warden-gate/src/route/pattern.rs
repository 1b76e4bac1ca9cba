//! `METHOD path` route patterns.

use super::path;
use crate::error::{WardenError, WardenResult};
use axum::http::Method;
use std::fmt;
use std::str::FromStr;

/// A composed route pattern: an optional method and a normalized path.
///
/// Without a method the pattern matches any method. Renders as
/// `"GET /orders"` or `"/orders"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    method: Option<Method>,
    path: String,
}

impl RoutePattern {
    /// Pattern from a method token (empty for any method) and a path that
    /// is normalized here.
    pub fn new(method: &str, path: &str) -> WardenResult<Self> {
        let path = path::join(path::ROOT, [path])?;
        path::check_wildcards(&path)?;
        Ok(Self {
            method: parse_method(method)?,
            path,
        })
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this pattern is the root path, which also answers unmatched requests.
    pub fn is_root(&self) -> bool {
        self.path == path::ROOT
    }
}

fn parse_method(token: &str) -> WardenResult<Option<Method>> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }
    Method::from_bytes(token.as_bytes())
        .map(Some)
        .map_err(|_| WardenError::InvalidMethod(token.to_string()))
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{} {}", method, self.path),
            None => f.write_str(&self.path),
        }
    }
}

impl FromStr for RoutePattern {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (method, path) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(path), None, None) => ("", path),
            (Some(method), Some(path), None) => (method, path),
            _ => return Err(WardenError::MalformedPattern(s.to_string())),
        };

        if !path.starts_with('/') {
            return Err(WardenError::MalformedPattern(s.to_string()));
        }

        Self::new(method, path)
    }
}
