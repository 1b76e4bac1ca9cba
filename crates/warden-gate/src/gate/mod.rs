//! Authorization gate middleware.

pub mod audit;
pub mod layer;
pub mod responder;
pub mod types;

pub use audit::GateAuditEvent;
pub use layer::{RoleGate, RoleGateLayer};
pub use responder::Responder;
pub use types::{Decision, Policy};
