//! Compiled role-set membership tests.

use super::id::{Role, RoleId, RoleKind};
use crate::error::RoleError;
use std::collections::HashSet;

/// Membership test compiled once from a role set.
///
/// The strategy is chosen from the kind of the first role:
///
/// - flag roles are OR-ed into one mask, and a candidate is a member when
///   every bit it carries is present in the mask (`mask & c == c`), so the
///   zero flag is a member of every flag set;
/// - token roles go into an exact-match set;
/// - an empty role set admits every candidate.
///
/// A candidate of the other kind is never a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValidator {
    /// No roles declared.
    Unrestricted,
    /// Union of the declared flag roles.
    Mask(u64),
    /// Declared token roles.
    Tokens(HashSet<String>),
}

impl RoleValidator {
    /// Compile a role set.
    ///
    /// Fails when the set mixes flag and token roles.
    pub fn new<R: Role>(roles: &[R]) -> Result<Self, RoleError> {
        let Some(first) = roles.first() else {
            return Ok(Self::Unrestricted);
        };
        let expected = first.id().kind();

        let mixed = |index: usize, found: RoleKind| RoleError::MixedKinds {
            index,
            expected,
            found,
        };

        match expected {
            RoleKind::Flags => {
                let mut mask = 0u64;
                for (index, role) in roles.iter().enumerate() {
                    match role.id() {
                        RoleId::Flags(bits) => mask |= bits,
                        other => return Err(mixed(index, other.kind())),
                    }
                }
                Ok(Self::Mask(mask))
            }
            RoleKind::Token => {
                let mut tokens = HashSet::with_capacity(roles.len());
                for (index, role) in roles.iter().enumerate() {
                    match role.id() {
                        RoleId::Token(token) => {
                            tokens.insert(token.to_owned());
                        }
                        other => return Err(mixed(index, other.kind())),
                    }
                }
                Ok(Self::Tokens(tokens))
            }
        }
    }

    /// Whether `candidate` belongs to the compiled set.
    pub fn is_member(&self, candidate: RoleId<'_>) -> bool {
        match (self, candidate) {
            (Self::Unrestricted, _) => true,
            (Self::Mask(mask), RoleId::Flags(bits)) => mask & bits == bits,
            (Self::Tokens(tokens), RoleId::Token(token)) => tokens.contains(token),
            _ => false,
        }
    }

    /// Kind of roles this validator was compiled from, if any.
    pub fn kind(&self) -> Option<RoleKind> {
        match self {
            Self::Unrestricted => None,
            Self::Mask(_) => Some(RoleKind::Flags),
            Self::Tokens(_) => Some(RoleKind::Token),
        }
    }
}
