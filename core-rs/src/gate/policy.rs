//! Presentation policies driven by an [`AccessDecision`]
//!
//! - [`HardGate`] protects a whole page: loading indicator while pending,
//!   redirect when denied, content when granted.
//! - [`SoftGate`] protects a section of a page that is already visible:
//!   content when granted, nothing otherwise, never a redirect.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

use crate::gate::decision::{AccessDecision, DenialReason};

/// Navigation side effect used by the hard gate
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Navigator that records every destination instead of moving anywhere
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.visits().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_string());
        }
    }
}

/// Redirect destinations for denied viewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Redirects {
    /// Public landing page for viewers who are not signed in
    pub public_root: String,
    /// Page shown to signed-in viewers lacking the permission
    pub unauthorized: String,
}

impl Default for Redirects {
    fn default() -> Self {
        Redirects {
            public_root: "/".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

/// What a gated view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    Loading,
    Redirected(String),
    Content(T),
}

impl<T> GateView<T> {
    pub fn content(self) -> Option<T> {
        match self {
            GateView::Content(content) => Some(content),
            _ => None,
        }
    }
}

/// Full page / route protection
#[derive(Debug, Clone, Default)]
pub struct HardGate {
    redirects: Redirects,
}

impl HardGate {
    pub fn new(redirects: Redirects) -> Self {
        HardGate { redirects }
    }

    pub fn redirects(&self) -> &Redirects {
        &self.redirects
    }

    /// Where a decision sends the viewer, if anywhere
    ///
    /// Lookup failures go to the same page as a missing permission.
    pub fn redirect_target(&self, decision: &AccessDecision) -> Option<&str> {
        match decision {
            AccessDecision::Denied(DenialReason::Unauthenticated) => {
                Some(self.redirects.public_root.as_str())
            }
            AccessDecision::Denied(
                DenialReason::Unauthorized
                | DenialReason::LookupFailure
                | DenialReason::NoPermissionRequired,
            ) => Some(self.redirects.unauthorized.as_str()),
            AccessDecision::Pending | AccessDecision::Granted => None,
        }
    }

    /// Render `content` or act on the denial
    ///
    /// `content` is only invoked for a granted decision.
    pub fn present<T, F>(
        &self,
        decision: &AccessDecision,
        navigator: &dyn Navigator,
        content: F,
    ) -> GateView<T>
    where
        F: FnOnce() -> T,
    {
        match decision {
            AccessDecision::Granted => GateView::Content(content()),
            AccessDecision::Pending => GateView::Loading,
            AccessDecision::Denied(reason) => {
                let target = self
                    .redirect_target(decision)
                    .unwrap_or(self.redirects.unauthorized.as_str())
                    .to_string();
                debug!(reason = reason.as_str(), target = %target, "hard gate redirecting");
                navigator.navigate(&target);
                GateView::Redirected(target)
            }
        }
    }
}

/// Section-level protection inside an accessible page
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftGate;

impl SoftGate {
    /// `Some(content)` when granted, `None` otherwise
    pub fn present<T, F>(&self, decision: &AccessDecision, content: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if decision.is_granted() {
            Some(content())
        } else {
            None
        }
    }
}
