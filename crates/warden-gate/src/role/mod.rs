//! Roles and role-set membership.

pub mod extractor;
pub mod id;
pub mod validator;

pub use extractor::{ExtensionRoleExtractor, HeaderRoleExtractor, RoleExtractor};
pub use id::{Role, RoleId, RoleKind};
pub use validator::RoleValidator;
