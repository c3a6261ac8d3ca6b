//! Access Gate
//!
//! Decides whether the current viewer may see protected admin content and
//! turns that decision into a view: content, a loading indicator, a
//! redirect, or nothing at all.
//!
//! Every evaluation takes the session explicitly. Nothing here reads ambient
//! session state.

pub mod access;
pub mod decision;
pub mod policy;

pub use access::{evaluate, AccessGate, GateStep, LookupTicket};
pub use decision::{AccessDecision, DenialReason};
pub use policy::{GateView, HardGate, Navigator, RecordingNavigator, Redirects, SoftGate};
