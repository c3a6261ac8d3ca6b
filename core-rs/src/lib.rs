//! # schoolgate - access control for the school website admin area
//!
//! The public pages (about, contact, gallery, checkout) are open to anyone.
//! The admin dashboard (blog authoring, student records, payments, site
//! settings) is not: every admin route and every admin-only section of a
//! shared page asks the **Access Gate** first.
//!
//! ## Core Principle
//!
//! **Fail closed.** A viewer sees protected content only when the session
//! is authenticated and the role store positively confirms the permission.
//! Signed-out viewers, missing permissions, unreachable stores and
//! undeclared requirements all end in a denial.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   Session    ┌─────────────┐  (user, permission)  ┌──────────────────┐
//! │ auth provider├─────────────►│ Access Gate ├─────────────────────►│ PermissionLookup │
//! └──────────────┘              └──────┬──────┘                      └────────┬─────────┘
//!                                      │ AccessDecision                       │
//!                         ┌────────────┴───────────┐                 ┌────────┴─────────┐
//!                         │ HardGate    SoftGate   │                 │ memory/file/http │
//!                         │ (redirect)  (omit)     │                 │ PermissionStore  │
//!                         └────────────────────────┘                 └──────────────────┘
//! ```

pub mod config;
pub mod errors;
pub mod gate;
pub mod rbac;
pub mod session;

pub use config::{GateConfig, StoreConfig};
pub use errors::GateError;
pub use gate::{
    evaluate, AccessDecision, AccessGate, DenialReason, GateStep, GateView, HardGate, LookupTicket,
    Navigator, RecordingNavigator, Redirects, SoftGate,
};
pub use rbac::{
    HttpStore, LookupOutcome, MemoryStore, Permission, PermissionLookup, PermissionSet,
    PermissionStore, YamlFileStore,
};
pub use session::{Session, SessionStatus, UserId};

/// Version of the gate configuration format
pub const CONFIG_VERSION: &str = config::API_VERSION;

/// Default public landing page
pub const DEFAULT_PUBLIC_ROOT: &str = "/";

/// Default page for signed-in viewers without the permission
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";
