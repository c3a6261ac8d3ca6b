//! Access decisions

use std::fmt;

use crate::rbac::LookupOutcome;

/// Why a viewer was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// No signed-in viewer
    Unauthenticated,
    /// Signed in but the permission is not held
    Unauthorized,
    /// The role store could not answer
    LookupFailure,
    /// The protected content named no permission
    NoPermissionRequired,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::Unauthorized => "unauthorized",
            DenialReason::LookupFailure => "lookup_failure",
            DenialReason::NoPermissionRequired => "no_permission_required",
        }
    }
}

/// Outcome of gating one render or request
///
/// Never persisted. A decision only holds for the session and permission it
/// was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    Pending,
    Granted,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AccessDecision::Pending)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }

    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            AccessDecision::Denied(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Decision for an authenticated viewer once the lookup has resolved
    pub fn from_outcome(outcome: &LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Granted => AccessDecision::Granted,
            LookupOutcome::NotGranted => AccessDecision::Denied(DenialReason::Unauthorized),
            LookupOutcome::Failed(_) => AccessDecision::Denied(DenialReason::LookupFailure),
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Pending => f.write_str("pending"),
            AccessDecision::Granted => f.write_str("granted"),
            AccessDecision::Denied(reason) => write!(f, "denied ({})", reason.as_str()),
        }
    }
}
