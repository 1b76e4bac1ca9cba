//! Gate policies and outcomes.

use std::fmt;

/// Polarity of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// The caller's role must belong to the role set.
    Allow,
    /// The caller's role must not belong to the role set.
    Deny,
}

impl Policy {
    /// Membership result this policy lets through.
    pub fn expected(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Whether a membership result passes the policy.
    pub fn permits(&self, member: bool) -> bool {
        member == self.expected()
    }

    /// Name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one request at a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Dispatch to the wrapped handler.
    Granted,
    /// No role could be extracted.
    Unauthenticated,
    /// A role was extracted but fails the policy.
    Forbidden,
}

impl Decision {
    /// Whether the wrapped handler runs.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Outcome name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
        }
    }
}
