//! Role gate middleware layer.

use super::{
    audit::GateAuditEvent,
    responder::Responder,
    types::{Decision, Policy},
};
use crate::error::RoleError;
use crate::role::{Role, RoleExtractor, RoleValidator};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

struct GateState<R> {
    extractor: Arc<dyn RoleExtractor<R>>,
    validator: RoleValidator,
    policy: Policy,
    on_unauthorized: Responder,
    on_forbidden: Responder,
    label: Arc<str>,
    log_decisions: bool,
}

impl<R> Clone for GateState<R> {
    fn clone(&self) -> Self {
        Self {
            extractor: self.extractor.clone(),
            validator: self.validator.clone(),
            policy: self.policy,
            on_unauthorized: self.on_unauthorized.clone(),
            on_forbidden: self.on_forbidden.clone(),
            label: self.label.clone(),
            log_decisions: self.log_decisions,
        }
    }
}

impl<R: Role> GateState<R> {
    fn evaluate(&self, req: &Request<Body>) -> Decision {
        let Some(role) = self.extractor.extract(req) else {
            return Decision::Unauthenticated;
        };

        if self.policy.permits(self.validator.is_member(role.id())) {
            Decision::Granted
        } else {
            Decision::Forbidden
        }
    }

    fn audit(&self, req: &Request<Body>, decision: Decision) {
        if !self.log_decisions {
            return;
        }
        GateAuditEvent {
            pattern: &self.label,
            method: req.method().as_str(),
            path: req.uri().path(),
            policy: self.policy,
            decision,
        }
        .log();
    }
}

/// Layer that puts a role gate in front of a service.
///
/// The role set is compiled once, when the layer is built. Every request is
/// then classified by [`RoleGateLayer::evaluate`] and exactly one of the
/// wrapped service, the unauthorized responder or the forbidden responder
/// answers it.
pub struct RoleGateLayer<R> {
    state: GateState<R>,
}

impl<R> Clone for RoleGateLayer<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<R: Role + 'static> RoleGateLayer<R> {
    /// Gate from an already compiled validator.
    pub fn new(policy: Policy, extractor: Arc<dyn RoleExtractor<R>>, validator: RoleValidator) -> Self {
        Self {
            state: GateState {
                extractor,
                validator,
                policy,
                on_unauthorized: Responder::unauthorized(),
                on_forbidden: Responder::forbidden(),
                label: Arc::from(""),
                log_decisions: false,
            },
        }
    }

    /// Gate that lets through callers whose role belongs to `roles`.
    pub fn allow_for<E, Q>(extractor: E, roles: &[Q]) -> Result<Self, RoleError>
    where
        E: RoleExtractor<R> + 'static,
        Q: Role,
    {
        Self::with_roles(Policy::Allow, extractor, roles)
    }

    /// Gate that lets through callers whose role does not belong to `roles`.
    pub fn deny_for<E, Q>(extractor: E, roles: &[Q]) -> Result<Self, RoleError>
    where
        E: RoleExtractor<R> + 'static,
        Q: Role,
    {
        Self::with_roles(Policy::Deny, extractor, roles)
    }

    fn with_roles<E, Q>(policy: Policy, extractor: E, roles: &[Q]) -> Result<Self, RoleError>
    where
        E: RoleExtractor<R> + 'static,
        Q: Role,
    {
        let validator = RoleValidator::new(roles)?;
        Ok(Self::new(policy, Arc::new(extractor), validator))
    }

    /// Replace the responder used when no role can be extracted.
    pub fn with_unauthorized(mut self, responder: Responder) -> Self {
        self.state.on_unauthorized = responder;
        self
    }

    /// Replace the responder used when the role fails the policy.
    pub fn with_forbidden(mut self, responder: Responder) -> Self {
        self.state.on_forbidden = responder;
        self
    }

    /// Name used for this gate in decision logs.
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.state.label = label.into();
        self
    }

    /// Log every decision through `tracing`.
    pub fn log_decisions(mut self, enabled: bool) -> Self {
        self.state.log_decisions = enabled;
        self
    }

    /// Polarity of this gate.
    pub fn policy(&self) -> Policy {
        self.state.policy
    }

    /// Compiled role set.
    pub fn validator(&self) -> &RoleValidator {
        &self.state.validator
    }

    /// Classify a request without dispatching it.
    pub fn evaluate(&self, req: &Request<Body>) -> Decision {
        self.state.evaluate(req)
    }
}

impl<S, R> Layer<S> for RoleGateLayer<R> {
    type Service = RoleGate<S, R>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGate {
            inner,
            state: Arc::new(self.state.clone()),
        }
    }
}

/// Service produced by [`RoleGateLayer`].
pub struct RoleGate<S, R> {
    inner: S,
    state: Arc<GateState<R>>,
}

impl<S: Clone, R> Clone for RoleGate<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S, R> Service<Request<Body>> for RoleGate<S, R>
where
    S: Service<Request<Body>, Error = Infallible>,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
    R: Role + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let decision = self.state.evaluate(&req);
        self.state.audit(&req, decision);

        let response = match decision {
            Decision::Granted => {
                let future = self.inner.call(req);
                return Box::pin(async move { future.await.map(IntoResponse::into_response) });
            }
            Decision::Unauthenticated => self.state.on_unauthorized.respond(&req),
            Decision::Forbidden => self.state.on_forbidden.respond(&req),
        };

        Box::pin(std::future::ready(Ok(response)))
    }
}
