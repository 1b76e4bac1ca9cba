//! Warden: role-gated route registration for axum.
//!
//! Routes are declared as a tree of immutable [`RouteNode`]s derived from an
//! [`HttpRouter`]. Each handler is registered either open, or behind a
//! [`RoleGateLayer`] that extracts the caller's role and checks it against a
//! compiled [`RoleValidator`] before the handler runs.
//!
//! # Architecture
//!
//! - **Roles**: bitmask flags (`u64`) or string tokens, and set membership
//! - **Gate**: allow/deny policy middleware with pluggable responders
//! - **Routes**: path composition, pattern parsing and the route table
//! - **Config**: file and environment configuration for the gate and demo
//!
//! ```no_run
//! use warden_gate::{HeaderRoleExtractor, HttpRouter};
//!
//! # fn main() -> warden_gate::WardenResult<()> {
//! let router = HttpRouter::<String>::new(HeaderRoleExtractor::default());
//! let orders = router.new_route(["orders"])?;
//! orders.allow_for("GET", "", || async { "orders" }, &["ADMIN", "CUSTOMER"])?;
//! orders.deny_for("DELETE", ":id", || async { "deleted" }, &["CUSTOMER"])?;
//! let app: axum::Router = router.build();
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod gate;
pub mod role;
pub mod route;

pub use config::{GateConfig, WardenConfig};
pub use error::{PathError, RoleError, WardenError, WardenResult};
pub use gate::{Decision, Policy, Responder, RoleGate, RoleGateLayer};
pub use role::{ExtensionRoleExtractor, HeaderRoleExtractor, Role, RoleExtractor, RoleId, RoleKind, RoleValidator};
pub use route::{HttpRouter, RouteNode, RoutePattern};
