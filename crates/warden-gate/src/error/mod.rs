//! Error handling for route wiring.

pub mod types;

pub use types::{PathError, RoleError, WardenError, WardenResult};
