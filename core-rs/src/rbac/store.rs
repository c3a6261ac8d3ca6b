//! Role store trait for schoolgate
//!
//! The role-permission assignment lives outside this crate. A store answers
//! "which permissions does this user hold right now" and nothing else.
//! Implementations include:
//! - MemoryStore (in-process, tests and demos)
//! - YamlFileStore (role file read on every lookup)
//! - HttpStore (remote user service)

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::errors::{GateError, Result};
use crate::rbac::permission::{Permission, PermissionSet};
use crate::session::UserId;

/// Permission store trait
///
/// Stores report failures as errors. Turning those errors into a closed gate
/// is the job of [`PermissionLookup`](crate::rbac::PermissionLookup), not of
/// the store.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// All permissions currently assigned to `user_id`
    ///
    /// An unknown user yields an empty set, not an error.
    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet>;

    /// Whether `user_id` currently holds `permission`
    async fn has_permission(&self, user_id: &UserId, permission: Permission) -> Result<bool> {
        Ok(self.permissions_for(user_id).await?.contains(permission))
    }
}

/// In-process permission store
#[derive(Debug, Default)]
pub struct MemoryStore {
    assignments: RwLock<HashMap<UserId, PermissionSet>>,
    offline: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(user, permissions)` pairs
    pub fn with_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (UserId, PermissionSet)>,
    {
        MemoryStore {
            assignments: RwLock::new(assignments.into_iter().collect()),
            offline: RwLock::new(false),
        }
    }

    pub async fn assign(&self, user_id: &UserId, permission: Permission) {
        self.assignments
            .write()
            .await
            .entry(user_id.clone())
            .or_default()
            .insert(permission);
    }

    pub async fn revoke(&self, user_id: &UserId, permission: Permission) -> bool {
        match self.assignments.write().await.get_mut(user_id) {
            Some(set) => set.remove(permission),
            None => false,
        }
    }

    /// Simulate the backing service going down or coming back
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet> {
        if *self.offline.read().await {
            return Err(GateError::StoreUnavailable(
                "memory store is offline".to_string(),
            ));
        }

        Ok(self
            .assignments
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
