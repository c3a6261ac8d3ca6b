/**
 * file_store.rs
 * Role file backed permission store (YAML format)
 *
 * Format:
 * ```yaml
 * roles:
 *   admin: [system_settings, users_manage, financial_manage]
 *   teacher: [blog_manage, students_manage]
 * users:
 *   u1: [admin]
 *   u2: [teacher]
 * ```
 *
 * The file is re-read on every lookup so role edits apply to the next
 * request without a restart.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{GateError, Result};
use crate::rbac::permission::PermissionSet;
use crate::rbac::store::PermissionStore;
use crate::session::UserId;

/// Parsed role file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoleFile {
    /// Role name -> permission names
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
    /// User id -> role names
    #[serde(default)]
    pub users: HashMap<String, Vec<String>>,
}

impl RoleFile {
    /// Parse role file content
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve a user's roles to the permissions they grant
    ///
    /// A user that references a role missing from `roles` makes the whole
    /// record malformed.
    pub fn permissions_for(&self, user_id: &str) -> Result<PermissionSet> {
        let Some(user_roles) = self.users.get(user_id) else {
            return Ok(PermissionSet::new());
        };

        let mut names = Vec::new();
        for role in user_roles {
            let granted = self.roles.get(role).ok_or_else(|| {
                GateError::MalformedRecord(format!(
                    "user '{}' references undefined role '{}'",
                    user_id, role
                ))
            })?;
            names.extend(granted.iter().map(String::as_str));
        }

        Ok(PermissionSet::from_names(names))
    }
}

/// Permission store backed by a YAML role file
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        YamlFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<RoleFile> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(GateError::FileNotFound(
                self.path.to_string_lossy().to_string(),
            ));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        RoleFile::parse(&content)
    }
}

#[async_trait]
impl PermissionStore for YamlFileStore {
    fn name(&self) -> &str {
        "yaml-file"
    }

    async fn permissions_for(&self, user_id: &UserId) -> Result<PermissionSet> {
        self.read().await?.permissions_for(user_id.as_str())
    }
}
