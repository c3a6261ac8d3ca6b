//! RBAC (Role-Based Access Control) module
//!
//! Provides the permission vocabulary, the role stores that hold
//! user-permission assignments, and the fail-closed lookup the access gate
//! delegates to.

pub mod file_store;
pub mod http_store;
pub mod lookup;
pub mod permission;
pub mod store;

pub use file_store::{RoleFile, YamlFileStore};
pub use http_store::HttpStore;
pub use lookup::{LookupOutcome, PermissionLookup};
pub use permission::{Permission, PermissionSet};
pub use store::{MemoryStore, PermissionStore};
