//! Gate decision logging.

use super::types::{Decision, Policy};
use tracing::{debug, warn};

/// One gate decision, as logged.
///
/// Carries the outcome only, never the role value.
#[derive(Debug)]
pub struct GateAuditEvent<'a> {
    /// Label of the gate, usually its route pattern.
    pub pattern: &'a str,
    /// Request method.
    pub method: &'a str,
    /// Request path.
    pub path: &'a str,
    /// Polarity of the gate.
    pub policy: Policy,
    /// Outcome for this request.
    pub decision: Decision,
}

impl GateAuditEvent<'_> {
    /// Emit the event: `warn!` for denials, `debug!` for grants.
    pub fn log(&self) {
        if self.decision.is_granted() {
            debug!(
                event = "authz_granted",
                pattern = %self.pattern,
                method = %self.method,
                path = %self.path,
                policy = %self.policy,
                "Authorization granted"
            );
        } else {
            warn!(
                event = "authz_denied",
                pattern = %self.pattern,
                method = %self.method,
                path = %self.path,
                policy = %self.policy,
                outcome = self.decision.as_str(),
                "Authorization denied"
            );
        }
    }
}
