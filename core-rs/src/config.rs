/**
 * config.rs
 * Parser for gate configuration files (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: schoolgate/v1
 * kind: GateConfig
 * metadata:
 *   name: school-admin
 * spec:
 *   redirects:
 *     publicRoot: /
 *     unauthorized: /unauthorized
 *   store:
 *     kind: file
 *     path: roles.yaml
 *   lookupTimeoutMs: 2000
 * ```
 *
 * Store kinds: `memory` (inline `users` map), `file` (role file, relative
 * paths resolve against the config file's directory), `http` (`url`,
 * optional `token`).
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{GateError, Result};
use crate::gate::{HardGate, Redirects};
use crate::rbac::{
    HttpStore, MemoryStore, Permission, PermissionLookup, PermissionSet, PermissionStore,
    YamlFileStore,
};
use crate::session::UserId;

pub const API_VERSION: &str = "schoolgate/v1";
pub const KIND: &str = "GateConfig";

/// Gate configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: Spec,
}

/// Config metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
}

/// Role store selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Inline assignments, user id -> permissions
    Memory {
        #[serde(default)]
        users: HashMap<String, Vec<Permission>>,
    },
    /// YAML role file
    File { path: PathBuf },
    /// Remote user service
    Http {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory {
            users: HashMap::new(),
        }
    }
}

/// Gate specification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    #[serde(default)]
    pub redirects: Redirects,
    #[serde(default)]
    pub store: StoreConfig,
    /// Per-lookup timeout; lookups slower than this are denied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_timeout_ms: Option<u64>,
}

impl GateConfig {
    /// Create a config with default redirects and an empty memory store
    pub fn new(name: String) -> Self {
        GateConfig {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: Metadata { name },
            spec: Spec::default(),
        }
    }

    /// Load a gate config from specified path
    ///
    /// # Example
    /// ```no_run
    /// # use schoolgate::config::GateConfig;
    /// let config = GateConfig::load("gate.yaml")?;
    /// assert_eq!(config.spec.redirects.unauthorized, "/unauthorized");
    /// # Ok::<(), schoolgate::GateError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(GateError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: GateConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        if let StoreConfig::File { path: store_path } = &mut config.spec.store {
            if store_path.is_relative() {
                if let Some(dir) = path.parent() {
                    let resolved = dir.join(&*store_path);
                    *store_path = resolved;
                }
            }
        }

        Ok(config)
    }

    /// Validate config structure
    ///
    /// Ensures:
    /// - apiVersion is "schoolgate/v1" and kind is "GateConfig"
    /// - metadata.name is non-empty
    /// - redirect targets are absolute paths on this site (no `//host`)
    /// - the selected store has what it needs
    pub fn validate(&self) -> Result<()> {
        if self.api_version != API_VERSION {
            return Err(GateError::ValidationError(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != KIND {
            return Err(GateError::ValidationError(format!(
                "Invalid kind: expected '{}', got '{}'",
                KIND, self.kind
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(GateError::ValidationError(
                "metadata.name cannot be empty".to_string(),
            ));
        }

        let redirects = &self.spec.redirects;
        for (field, value) in [
            ("redirects.publicRoot", &redirects.public_root),
            ("redirects.unauthorized", &redirects.unauthorized),
        ] {
            if !value.starts_with('/') || value.starts_with("//") {
                return Err(GateError::ValidationError(format!(
                    "{} must be an absolute path on this site, got '{}'",
                    field, value
                )));
            }
        }

        if self.spec.lookup_timeout_ms == Some(0) {
            return Err(GateError::ValidationError(
                "lookupTimeoutMs must be greater than zero".to_string(),
            ));
        }

        match &self.spec.store {
            StoreConfig::Memory { users } => {
                for id in users.keys() {
                    UserId::new(id.as_str())?;
                }
            }
            StoreConfig::File { path } => {
                if path.as_os_str().is_empty() {
                    return Err(GateError::ValidationError(
                        "store.path cannot be empty".to_string(),
                    ));
                }
            }
            StoreConfig::Http { url, .. } => {
                HttpStore::new(url)?;
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    /// Hard gate with the configured redirect targets
    pub fn hard_gate(&self) -> HardGate {
        HardGate::new(self.spec.redirects.clone())
    }

    /// Build the configured store
    pub fn build_store(&self) -> Result<Arc<dyn PermissionStore>> {
        let store: Arc<dyn PermissionStore> = match &self.spec.store {
            StoreConfig::Memory { users } => {
                let mut assignments = Vec::with_capacity(users.len());
                for (id, permissions) in users {
                    let set: PermissionSet = permissions.iter().copied().collect();
                    assignments.push((UserId::new(id.as_str())?, set));
                }
                Arc::new(MemoryStore::with_assignments(assignments))
            }
            StoreConfig::File { path } => Arc::new(YamlFileStore::new(path)),
            StoreConfig::Http { url, token } => {
                let mut store = HttpStore::new(url)?;
                if let Some(token) = token {
                    store = store.with_auth(token.clone());
                }
                if let Some(timeout) = self.lookup_timeout() {
                    store = store.with_timeout(timeout)?;
                }
                Arc::new(store)
            }
        };

        Ok(store)
    }

    /// Fail-closed lookup over the configured store
    pub fn build_lookup(&self) -> Result<PermissionLookup> {
        let lookup = PermissionLookup::new(self.build_store()?);
        Ok(match self.lookup_timeout() {
            Some(timeout) => lookup.with_timeout(timeout),
            None => lookup,
        })
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.spec.lookup_timeout_ms.map(Duration::from_millis)
    }
}
