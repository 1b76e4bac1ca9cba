//! Hierarchical route nodes.

use super::{path, pattern::RoutePattern, router::HttpRouter};
use crate::{
    error::WardenResult,
    gate::Policy,
    role::Role,
};
use axum::handler::Handler;

/// An immutable URL prefix bound to the router that owns it.
///
/// Deriving a child never touches the parent, and registration is forwarded
/// to the owning [`HttpRouter`].
pub struct RouteNode<R> {
    prefix: String,
    owner: HttpRouter<R>,
}

impl<R> Clone for RouteNode<R> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            owner: self.owner.clone(),
        }
    }
}

impl<R> std::fmt::Debug for RouteNode<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteNode").field("prefix", &self.prefix).finish()
    }
}

impl<R: Role + 'static> RouteNode<R> {
    pub(crate) fn new(prefix: String, owner: HttpRouter<R>) -> Self {
        Self { prefix, owner }
    }

    /// The node's URL prefix.
    pub fn url(&self) -> &str {
        &self.prefix
    }

    /// Router this node registers into.
    pub fn owner(&self) -> &HttpRouter<R> {
        &self.owner
    }

    /// Child node with `segments` appended to this prefix.
    pub fn next<I, S>(&self, segments: I) -> WardenResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = path::join(&self.prefix, segments)?;
        Ok(Self::new(prefix, self.owner.clone()))
    }

    /// Register an unguarded handler at `suffix` below this node.
    ///
    /// An empty `method` matches any method.
    pub fn handle<H, T>(&self, method: &str, suffix: &str, handler: H) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.owner.register_open(vec![self.pattern(method, suffix)?], handler)
    }

    /// Register one unguarded handler under several methods.
    ///
    /// With no methods the handler matches any method. Either every pattern
    /// is registered or, on the first failure, none is.
    pub fn handle_methods<H, T>(&self, methods: &[&str], suffix: &str, handler: H) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let patterns = if methods.is_empty() {
            vec![self.pattern("", suffix)?]
        } else {
            methods
                .iter()
                .map(|method| self.pattern(method, suffix))
                .collect::<WardenResult<Vec<_>>>()?
        };
        self.owner.register_open(patterns, handler)
    }

    /// Register a handler at `suffix` reachable only by roles in `roles`.
    pub fn allow_for<H, T, Q>(&self, method: &str, suffix: &str, handler: H, roles: &[Q]) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
        Q: Role,
    {
        self.owner
            .register_guarded(Policy::Allow, self.pattern(method, suffix)?, handler, roles)
    }

    /// Register a handler at `suffix` reachable only by roles outside `roles`.
    pub fn deny_for<H, T, Q>(&self, method: &str, suffix: &str, handler: H, roles: &[Q]) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
        Q: Role,
    {
        self.owner
            .register_guarded(Policy::Deny, self.pattern(method, suffix)?, handler, roles)
    }

    fn pattern(&self, method: &str, suffix: &str) -> WardenResult<RoutePattern> {
        let path = path::join(&self.prefix, [suffix])?;
        RoutePattern::new(method, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PathError, WardenError};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn role(req: &Request<Body>) -> Option<u64> {
        req.extensions().get::<u64>().copied()
    }

    async fn echo(body: String) -> (StatusCode, String) {
        (StatusCode::OK, body)
    }

    #[test]
    fn test_next_route_levels() {
        let router = HttpRouter::new(role);
        let level0 = router.new_route::<[&str; 0], &str>([]).unwrap();
        let level1 = level0.next(["level", "1"]).unwrap();
        let level2 = level1.next(["level", "2"]).unwrap();

        assert_eq!(level0.url(), "/");
        assert_eq!(level1.url(), "/level/1");
        assert_eq!(level2.url(), "/level/1/level/2");

        assert!(level1.url().starts_with(level0.url()));
        assert!(level2.url().starts_with(&format!("{}/", level1.url())));
    }

    #[test]
    fn test_next_is_associative() {
        let router = HttpRouter::new(role);
        let root = router.new_route([""]).unwrap();
        let stepwise = root.next(["a"]).unwrap().next(["b"]).unwrap();
        let combined = root.next(["a", "b"]).unwrap();
        assert_eq!(stepwise.url(), combined.url());
    }

    #[test]
    fn test_next_leaves_parent_untouched() {
        let router = HttpRouter::new(role);
        let orders = router.new_route(["orders"]).unwrap();
        let _ = orders.next(["items"]).unwrap();
        assert_eq!(orders.url(), "/orders");
    }

    #[test]
    fn test_composition_errors() {
        let router = HttpRouter::new(role);
        let root = router.new_route(["api"]).unwrap();

        let err = root.next(["%e"]).unwrap_err();
        assert!(matches!(err, WardenError::Path(PathError::InvalidEscape(_))));
        assert!(err.is_composition_error());

        assert!(matches!(
            router.new_route(["..", "etc"]),
            Err(WardenError::Path(PathError::ParentSegment(_)))
        ));

        let files = root.next(["files", "*rest"]).unwrap();
        assert!(matches!(
            files.handle("GET", "meta", echo),
            Err(WardenError::Path(PathError::MisplacedWildcard { .. }))
        ));
        assert!(matches!(root.handle("FETCH ME", "", echo), Err(WardenError::InvalidMethod(_))));
    }

    #[test]
    fn test_nodes_share_one_owner() {
        let router = HttpRouter::new(role);
        let demo = router.new_route(["demo"]).unwrap();
        let level = demo.next(["level"]).unwrap();

        demo.handle("GET", "", echo).unwrap();
        level.handle("POST", "1", echo).unwrap();

        assert_eq!(router.patterns(), vec!["GET /demo", "POST /demo/level/1"]);
        assert_eq!(level.owner().patterns(), router.patterns());
    }

    #[tokio::test]
    async fn test_handle_methods() {
        let router = HttpRouter::new(role);
        let root = router.new_route::<[&str; 0], &str>([]).unwrap();
        let r1 = root.next(["demo", "1"]).unwrap();
        let r2 = root.next(["level", "1"]).unwrap();

        root.handle_methods(&[], "", echo).unwrap();
        r1.handle_methods(&["GET", "PUT"], "", echo).unwrap();
        r2.handle_methods(&["POST"], "", echo).unwrap();

        assert_eq!(
            router.patterns(),
            vec!["/", "GET /demo/1", "POST /level/1", "PUT /demo/1"]
        );

        let app = router.build();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri(r1.url())
                    .body(Body::from("payload"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().method(Method::POST).uri("/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_handle_methods_is_all_or_nothing() {
        let router = HttpRouter::new(role);
        let tunnel = router.new_route(["tunnel"]).unwrap();

        assert!(matches!(
            tunnel.handle_methods(&["GET", "CONNECT"], "", echo),
            Err(WardenError::UnsupportedMethod(_))
        ));
        assert!(matches!(
            tunnel.handle_methods(&["GET", "BAD TOKEN"], "", echo),
            Err(WardenError::InvalidMethod(_))
        ));
        assert!(matches!(
            tunnel.handle_methods(&["POST", "POST"], "", echo),
            Err(WardenError::DuplicatePattern(_))
        ));
        assert!(router.patterns().is_empty());

        tunnel.handle("PUT", "", echo).unwrap();
        assert!(matches!(
            tunnel.handle_methods(&["GET", "PUT"], "", echo),
            Err(WardenError::DuplicatePattern(p)) if p == "PUT /tunnel"
        ));
        assert_eq!(router.patterns(), vec!["PUT /tunnel"]);

        tunnel.handle_methods(&["GET", "POST"], "", echo).unwrap();
        assert_eq!(router.patterns(), vec!["GET /tunnel", "POST /tunnel", "PUT /tunnel"]);
    }
}
