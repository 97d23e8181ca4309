//! The persisted authentication record.
//!
//! The frontend keeps its session in localStorage under the `auth` key:
//! `{"isAuthenticated": true, "user": {"role", "email", "username"}}`.
//! Protected routes read this record on render, so seeding it (origin must
//! be loaded first - localStorage is origin-scoped) stands in for a real
//! login. Reads here are side-effect free: polling the stored record never
//! mutates it.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::browser::BrowserSession;
use crate::error::Result;

pub const AUTH_STORAGE_KEY: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub role: String,
    pub email: String,
    pub username: String,
}

impl AuthState {
    /// The admin session the original suite seeds for privileged pages.
    pub fn admin() -> Self {
        Self {
            is_authenticated: true,
            user: AuthUser {
                role: "admin".to_string(),
                email: "admin@example.com".to_string(),
                username: "Admin".to_string(),
            },
        }
    }

    /// An authenticated regular user.
    pub fn user(email: &str, username: &str) -> Self {
        Self {
            is_authenticated: true,
            user: AuthUser {
                role: "user".to_string(),
                email: email.to_string(),
                username: username.to_string(),
            },
        }
    }
}

/// Writes the auth record into localStorage on the current origin.
pub async fn seed(session: &BrowserSession, state: &AuthState) -> Result<()> {
    let payload = serde_json::to_string(state)?;
    session
        .execute_json(
            "window.localStorage.setItem(arguments[0], arguments[1]);",
            vec![json!(AUTH_STORAGE_KEY), json!(payload)],
        )
        .await?;
    Ok(())
}

/// Reads the stored auth record, if any. Read-only: safe to poll.
pub async fn stored(session: &BrowserSession) -> Result<Option<AuthState>> {
    let raw = session
        .execute_json(
            "return window.localStorage.getItem(arguments[0]);",
            vec![json!(AUTH_STORAGE_KEY)],
        )
        .await?;

    match raw.as_str() {
        Some(text) if !text.is_empty() => Ok(Some(serde_json::from_str(text)?)),
        _ => Ok(None),
    }
}

/// Removes the stored auth record.
pub async fn clear(session: &BrowserSession) -> Result<()> {
    session
        .execute_json(
            "window.localStorage.removeItem(arguments[0]);",
            vec![json!(AUTH_STORAGE_KEY)],
        )
        .await?;
    Ok(())
}

/// Whether an authenticated record is currently stored.
pub async fn is_authenticated(session: &BrowserSession) -> Result<bool> {
    Ok(stored(session).await?.is_some_and(|state| state.is_authenticated))
}
