//! Role identifiers.

use std::fmt;
use std::sync::Arc;

/// The two representations a role identifier can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// Bit-flag identifier.
    Flags,
    /// Case-sensitive string token.
    Token,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => f.write_str("flags"),
            Self::Token => f.write_str("token"),
        }
    }
}

/// Borrowed view of a role's underlying value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleId<'a> {
    /// Unsigned 64-bit flag value.
    Flags(u64),
    /// Case-sensitive token.
    Token(&'a str),
}

impl RoleId<'_> {
    /// Kind of this identifier.
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Flags(_) => RoleKind::Flags,
            Self::Token(_) => RoleKind::Token,
        }
    }
}

/// A caller's authorization class.
///
/// Identity is defined by [`Role::id`] alone: two roles with equal ids are
/// indistinguishable to the gate.
pub trait Role {
    /// Underlying identifier.
    fn id(&self) -> RoleId<'_>;
}

impl Role for u64 {
    fn id(&self) -> RoleId<'_> {
        RoleId::Flags(*self)
    }
}

impl Role for str {
    fn id(&self) -> RoleId<'_> {
        RoleId::Token(self)
    }
}

impl Role for String {
    fn id(&self) -> RoleId<'_> {
        RoleId::Token(self)
    }
}

impl<R: Role + ?Sized> Role for &R {
    fn id(&self) -> RoleId<'_> {
        (**self).id()
    }
}

impl<R: Role + ?Sized> Role for Box<R> {
    fn id(&self) -> RoleId<'_> {
        (**self).id()
    }
}

impl<R: Role + ?Sized> Role for Arc<R> {
    fn id(&self) -> RoleId<'_> {
        (**self).id()
    }
}

impl Role for RoleId<'_> {
    fn id(&self) -> RoleId<'_> {
        *self
    }
}
