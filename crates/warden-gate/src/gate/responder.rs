//! Responses written when a gate refuses a request.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::{fmt, sync::Arc};

/// Builds the response for a refused request.
///
/// The request is borrowed so a responder can look at headers or extensions;
/// it is never forwarded anywhere else.
#[derive(Clone)]
pub struct Responder {
    respond: Arc<dyn Fn(&Request<Body>) -> Response + Send + Sync>,
}

impl Responder {
    /// Responder from a closure.
    pub fn new<F, T>(f: F) -> Self
    where
        F: Fn(&Request<Body>) -> T + Send + Sync + 'static,
        T: IntoResponse,
    {
        Self {
            respond: Arc::new(move |req: &Request<Body>| f(req).into_response()),
        }
    }

    /// Status-only response with an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self::new(move |_| status)
    }

    /// Plain-text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let body: Arc<str> = Arc::from(body.into());
        Self::new(move |_| (status, body.to_string()))
    }

    /// Default for callers without a determinable role: 401, empty body.
    pub fn unauthorized() -> Self {
        Self::status(StatusCode::UNAUTHORIZED)
    }

    /// Default for callers whose role fails the policy: 403, empty body.
    pub fn forbidden() -> Self {
        Self::status(StatusCode::FORBIDDEN)
    }

    /// Build the response for `req`.
    pub fn respond(&self, req: &Request<Body>) -> Response {
        (self.respond)(req)
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_are_status_only() {
        let req = Request::new(Body::empty());

        let response = Responder::unauthorized().respond(&req);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.is_empty());

        let response = Responder::forbidden().respond(&req);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_text_responder() {
        let req = Request::new(Body::empty());
        let response = Responder::text(StatusCode::FORBIDDEN, "forbidden").respond(&req);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, "forbidden");
    }

    #[tokio::test]
    async fn test_closure_sees_request() {
        let responder = Responder::new(|req: &Request<Body>| {
            (StatusCode::UNAUTHORIZED, format!("login required for {}", req.uri().path()))
        });
        let req = Request::builder().uri("/orders").body(Body::empty()).unwrap();
        assert_eq!(body_string(responder.respond(&req)).await, "login required for /orders");
    }
}
