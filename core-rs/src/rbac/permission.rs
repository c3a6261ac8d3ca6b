//! Permission names recognized by the admin area
//!
//! Permissions are flat capabilities. There is no hierarchy, no wildcard and
//! no implication between them: `system_settings` does not imply
//! `users_manage`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::GateError;

/// Closed set of capabilities guarding admin routes and sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Site-wide settings page
    SystemSettings,
    /// Staff and user account management
    UsersManage,
    /// Fee schedules, refunds and financial reports
    FinancialManage,
    /// Blog authoring and publishing
    BlogManage,
    /// Student records
    StudentsManage,
    /// Gallery uploads and curation
    GalleryManage,
    /// Read-only view of checkout payments
    PaymentsView,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::SystemSettings,
        Permission::UsersManage,
        Permission::FinancialManage,
        Permission::BlogManage,
        Permission::StudentsManage,
        Permission::GalleryManage,
        Permission::PaymentsView,
    ];

    /// Wire name used by role stores and configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::SystemSettings => "system_settings",
            Permission::UsersManage => "users_manage",
            Permission::FinancialManage => "financial_manage",
            Permission::BlogManage => "blog_manage",
            Permission::StudentsManage => "students_manage",
            Permission::GalleryManage => "gallery_manage",
            Permission::PaymentsView => "payments_view",
        }
    }
}

impl FromStr for Permission {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| GateError::UnknownPermission(s.to_string()))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions currently assigned to one user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw store names.
    ///
    /// Unrecognized names are dropped: a name the gate does not know can
    /// never be granted.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = PermissionSet::new();
        for name in names {
            let name = name.as_ref();
            match name.parse::<Permission>() {
                Ok(permission) => {
                    set.insert(permission);
                }
                Err(_) => {
                    tracing::debug!(permission = name, "ignoring unrecognized permission name");
                }
            }
        }
        set
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.granted.insert(permission)
    }

    pub fn remove(&mut self, permission: Permission) -> bool {
        self.granted.remove(&permission)
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Permissions in stable order
    pub fn sorted(&self) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self.granted.iter().copied().collect();
        permissions.sort();
        permissions
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        PermissionSet {
            granted: iter.into_iter().collect(),
        }
    }
}
