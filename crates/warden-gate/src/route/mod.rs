//! Route composition and registration.

pub mod node;
pub mod path;
pub mod pattern;
pub mod router;

pub use node::RouteNode;
pub use pattern::RoutePattern;
pub use router::HttpRouter;
