//! Fail-closed permission lookup
//!
//! Wraps a [`PermissionStore`] so that every failure (unreachable service,
//! malformed record, timeout) becomes "not granted". The failure kind is kept
//! in [`LookupOutcome::Failed`] and logged so operators can tell an outage
//! from a missing role.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::GateError;
use crate::rbac::permission::Permission;
use crate::rbac::store::PermissionStore;
use crate::session::UserId;

/// Result of one permission lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Granted,
    NotGranted,
    /// The store could not answer; treated as not granted
    Failed(String),
}

impl LookupOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, LookupOutcome::Granted)
    }
}

/// Permission lookup against an external role store
#[derive(Clone)]
pub struct PermissionLookup {
    store: Arc<dyn PermissionStore>,
    timeout: Option<Duration>,
}

impl PermissionLookup {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        PermissionLookup {
            store,
            timeout: None,
        }
    }

    /// Give up on lookups slower than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Check whether `user_id` holds `permission`, never raising
    pub async fn check(&self, user_id: &UserId, permission: Permission) -> LookupOutcome {
        let query = self.store.has_permission(user_id, permission);

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, query).await {
                Ok(result) => result,
                Err(_) => Err(GateError::Timeout(limit.as_millis() as u64)),
            },
            None => query.await,
        };

        match result {
            Ok(true) => {
                debug!(user = %user_id, %permission, store = self.store.name(), "permission granted");
                LookupOutcome::Granted
            }
            Ok(false) => {
                debug!(user = %user_id, %permission, store = self.store.name(), "permission not held");
                LookupOutcome::NotGranted
            }
            Err(e) => {
                warn!(
                    user = %user_id,
                    %permission,
                    store = self.store.name(),
                    error = %e,
                    "permission lookup failed, denying"
                );
                LookupOutcome::Failed(e.to_string())
            }
        }
    }

    /// `true` iff the store currently associates `permission` with `user_id`
    pub async fn has_permission(&self, user_id: &UserId, permission: Permission) -> bool {
        self.check(user_id, permission).await.is_granted()
    }
}

impl std::fmt::Debug for PermissionLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionLookup")
            .field("store", &self.store.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
