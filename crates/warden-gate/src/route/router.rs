//! Router owner: the single funnel through which routes are registered.

use super::{
    node::RouteNode,
    path::{self, ROOT},
    pattern::RoutePattern,
};
use crate::{
    config::GateConfig,
    error::{WardenError, WardenResult},
    gate::{Policy, Responder, RoleGateLayer},
    role::{Role, RoleExtractor, RoleValidator},
};
use axum::{
    body::Body,
    handler::Handler,
    http::{Method, Request, StatusCode},
    response::IntoResponse,
    routing::{MethodFilter, MethodRouter},
    Router,
};
use parking_lot::{Mutex, RwLock};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    convert::Infallible,
    sync::Arc,
};
use tower::{Layer, Service};
use tracing::debug;
use warden_common_log::spans::registration_span;

/// Responders and logging applied to gates at registration time.
#[derive(Clone)]
struct GateSettings {
    on_unauthorized: Responder,
    on_forbidden: Responder,
    log_decisions: bool,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            on_unauthorized: Responder::unauthorized(),
            on_forbidden: Responder::forbidden(),
            log_decisions: GateConfig::default().log_decisions,
        }
    }
}

#[derive(Default)]
struct RouteTable {
    patterns: HashSet<RoutePattern>,
    paths: BTreeMap<String, MethodRouter>,
    /// Capture segment claimed at each position, keyed by the shape of the
    /// segments before it.
    captures: HashMap<String, String>,
}

impl RouteTable {
    /// Validate a batch of patterns against the table and each other
    /// without changing the table. Returns the new capture claims.
    fn check(&self, patterns: &[RoutePattern]) -> WardenResult<HashMap<String, String>> {
        let mut seen = HashSet::new();
        let mut claims: HashMap<String, String> = HashMap::new();

        for pattern in patterns {
            if self.patterns.contains(pattern) || !seen.insert(pattern) {
                return Err(WardenError::DuplicatePattern(pattern.to_string()));
            }

            let mut shape = String::new();
            for segment in pattern.path().split('/').filter(|s| !s.is_empty()) {
                if path::is_capture(segment) {
                    match self.captures.get(&shape).or_else(|| claims.get(&shape)) {
                        Some(existing) if existing != segment => {
                            return Err(WardenError::CaptureConflict {
                                path: pattern.path().to_string(),
                                segment: segment.to_string(),
                                existing: existing.clone(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            claims.insert(shape.clone(), segment.to_string());
                        }
                    }
                    shape.push_str("/:");
                } else {
                    shape.push('/');
                    shape.push_str(segment);
                }
            }
        }
        Ok(claims)
    }
}

struct Shared<R> {
    extractor: Arc<dyn RoleExtractor<R>>,
    settings: RwLock<GateSettings>,
    table: Mutex<RouteTable>,
}

/// Owner of the route table and of the role extractor shared by every gate.
///
/// Handles are cheap to clone and all clones register into the same table.
/// Wiring is expected to finish before [`HttpRouter::build`] hands the
/// routes to axum; the built router does not observe later registrations.
pub struct HttpRouter<R> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for HttpRouter<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<R: Role + 'static> HttpRouter<R> {
    /// Router whose gates read the caller's role with `extractor`.
    pub fn new<E>(extractor: E) -> Self
    where
        E: RoleExtractor<R> + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                extractor: Arc::new(extractor),
                settings: RwLock::new(GateSettings::default()),
                table: Mutex::new(RouteTable::default()),
            }),
        }
    }

    /// Apply responder bodies and decision logging from configuration.
    pub fn with_config(self, config: &GateConfig) -> Self {
        {
            let mut settings = self.shared.settings.write();
            if let Some(body) = &config.unauthorized_body {
                settings.on_unauthorized = Responder::text(StatusCode::UNAUTHORIZED, body.clone());
            }
            if let Some(body) = &config.forbidden_body {
                settings.on_forbidden = Responder::text(StatusCode::FORBIDDEN, body.clone());
            }
            settings.log_decisions = config.log_decisions;
        }
        self
    }

    /// Responder for callers without a role, used by gates registered from now on.
    pub fn set_unauthorized_responder(&self, responder: Responder) {
        self.shared.settings.write().on_unauthorized = responder;
    }

    /// Responder for callers whose role fails the policy, used by gates registered from now on.
    pub fn set_forbidden_responder(&self, responder: Responder) {
        self.shared.settings.write().on_forbidden = responder;
    }

    /// Route node for the given path segments, joined under `/`.
    pub fn new_route<I, S>(&self, segments: I) -> WardenResult<RouteNode<R>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = path::join(ROOT, segments)?;
        Ok(RouteNode::new(prefix, self.clone()))
    }

    /// Register an unguarded handler under a `"METHOD /path"` pattern.
    pub fn handle<H, T>(&self, pattern: &str, handler: H) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.register_open(vec![pattern.parse()?], handler)
    }

    /// Register a handler reachable only by callers whose role belongs to `roles`.
    pub fn allow_for<H, T, Q>(&self, pattern: &str, handler: H, roles: &[Q]) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
        Q: Role,
    {
        self.register_guarded(Policy::Allow, pattern.parse()?, handler, roles)
    }

    /// Register a handler reachable only by callers whose role does not belong to `roles`.
    pub fn deny_for<H, T, Q>(&self, pattern: &str, handler: H, roles: &[Q]) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
        Q: Role,
    {
        self.register_guarded(Policy::Deny, pattern.parse()?, handler, roles)
    }

    /// Registered patterns, sorted.
    pub fn patterns(&self) -> Vec<String> {
        let table = self.shared.table.lock();
        let mut patterns: Vec<String> = table.patterns.iter().map(ToString::to_string).collect();
        patterns.sort();
        patterns
    }

    /// Hand the registered routes to axum.
    ///
    /// Handlers registered on the root path `/` also answer requests that
    /// match no other route.
    pub fn build(&self) -> Router {
        let table = self.shared.table.lock();

        let mut router = table
            .paths
            .iter()
            .fold(Router::new(), |router, (path, entry)| router.route(path, entry.clone()));

        if let Some(root) = table.paths.get(ROOT) {
            router = router.fallback_service(root.clone());
        }

        router
    }

    /// Register one handler under every pattern in `patterns`, or under none of them.
    pub(crate) fn register_open<H, T>(&self, patterns: Vec<RoutePattern>, handler: H) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.insert(patterns, "none", handler.with_state(()))
    }

    pub(crate) fn register_guarded<H, T, Q>(
        &self,
        policy: Policy,
        pattern: RoutePattern,
        handler: H,
        roles: &[Q],
    ) -> WardenResult<()>
    where
        H: Handler<T, ()>,
        T: 'static,
        Q: Role,
    {
        let validator = RoleValidator::new(roles)?;
        let settings = self.shared.settings.read().clone();

        let gate = RoleGateLayer::new(policy, self.shared.extractor.clone(), validator)
            .with_unauthorized(settings.on_unauthorized)
            .with_forbidden(settings.on_forbidden)
            .with_label(pattern.to_string())
            .log_decisions(settings.log_decisions);

        self.insert(vec![pattern], policy.as_str(), gate.layer(handler.with_state(())))
    }

    fn insert<S>(&self, patterns: Vec<RoutePattern>, guard: &str, service: S) -> WardenResult<()>
    where
        S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
        S::Response: IntoResponse + 'static,
        S::Future: Send + 'static,
    {
        let rendered: Vec<String> = patterns.iter().map(ToString::to_string).collect();
        let span = registration_span(&rendered.join(", "), guard);
        let _enter = span.enter();

        let filters = patterns
            .iter()
            .map(|pattern| pattern.method().map(method_filter).transpose())
            .collect::<WardenResult<Vec<_>>>()?;

        let mut table = self.shared.table.lock();
        let claims = table.check(&patterns)?;
        table.captures.extend(claims);

        for ((pattern, filter), rendered) in patterns.into_iter().zip(filters).zip(rendered) {
            let entry = table
                .paths
                .remove(pattern.path())
                .unwrap_or_else(MethodRouter::new);
            let entry = match filter {
                Some(filter) => entry.on_service(filter, service.clone()),
                None => entry.fallback_service(service.clone()),
            };
            table.paths.insert(pattern.path().to_string(), entry);
            table.patterns.insert(pattern);

            debug!(pattern = %rendered, guard, "Registered route");
        }
        Ok(())
    }
}

fn method_filter(method: &Method) -> WardenResult<MethodFilter> {
    let filters = [
        (Method::GET, MethodFilter::GET),
        (Method::HEAD, MethodFilter::HEAD),
        (Method::POST, MethodFilter::POST),
        (Method::PUT, MethodFilter::PUT),
        (Method::PATCH, MethodFilter::PATCH),
        (Method::DELETE, MethodFilter::DELETE),
        (Method::OPTIONS, MethodFilter::OPTIONS),
        (Method::TRACE, MethodFilter::TRACE),
    ];

    filters
        .into_iter()
        .find(|(candidate, _)| candidate == method)
        .map(|(_, filter)| filter)
        .ok_or_else(|| WardenError::UnsupportedMethod(method.clone()))
}
