//! Warden configuration module.

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::*;
pub use types::*;
pub use validation::*;
