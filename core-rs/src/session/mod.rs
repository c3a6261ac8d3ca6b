//! Viewer sessions as reported by the authentication provider
//!
//! The gate never issues or refreshes sessions; it only reads the
//! `{userId, status}` pair handed to it by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{GateError, Result};

/// Opaque, non-empty user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GateError::InvalidUserId(
                "user id cannot be empty".to_string(),
            ));
        }
        if id == "." || id == ".." {
            return Err(GateError::InvalidUserId(format!(
                "'{}' is not a usable user id",
                id
            )));
        }
        Ok(UserId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self> {
        UserId::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication status of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Unauthenticated,
    Loading,
    Authenticated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Loading => "loading",
            SessionStatus::Authenticated => "authenticated",
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unauthenticated" => Ok(SessionStatus::Unauthenticated),
            "loading" => Ok(SessionStatus::Loading),
            "authenticated" => Ok(SessionStatus::Authenticated),
            other => Err(GateError::ValidationError(format!(
                "Invalid session status: '{}'",
                other
            ))),
        }
    }
}

/// Session snapshot for one render or request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub status: SessionStatus,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Session {
            user_id: None,
            status: SessionStatus::Unauthenticated,
        }
    }

    pub fn loading() -> Self {
        Session {
            user_id: None,
            status: SessionStatus::Loading,
        }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Session {
            user_id: Some(user_id),
            status: SessionStatus::Authenticated,
        }
    }

    /// The viewer's id, only when the session is authenticated
    pub fn authenticated_user(&self) -> Option<&UserId> {
        match self.status {
            SessionStatus::Authenticated => self.user_id.as_ref(),
            _ => None,
        }
    }

    /// Identity used to invalidate decisions made for an earlier session
    pub fn key(&self) -> SessionKey {
        SessionKey {
            status: self.status,
            user_id: self.user_id.clone(),
        }
    }
}

/// Identity of a session for decision invalidation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    status: SessionStatus,
    user_id: Option<UserId>,
}

impl SessionKey {
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}
