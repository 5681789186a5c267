//! Signed-in user, persisted under the `auth_user` key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChemventoryError, Result};
use crate::local::KeyValueStore;

pub const AUTH_USER_KEY: &str = "auth_user";

/// Display name used when an email has no local part.
const FALLBACK_NAME: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl User {
    /// The name is the part of the email before `@`.
    pub fn from_email(email: &str) -> Self {
        let email = email.trim();
        let local = email.split('@').next().unwrap_or_default();
        let name = if local.is_empty() { FALLBACK_NAME } else { local };
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the signed-in user's email is in `admin_emails`.
    pub fn is_admin(&self, admin_emails: &[String]) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| admin_emails.iter().any(|admin| admin == &user.email))
    }
}

/// Split a comma separated admin list, dropping blanks.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Restores, starts and ends sessions.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted session. Anything unreadable means signed out.
    pub fn restore(&self) -> Session {
        let raw = match self.store.get(AUTH_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::signed_out(),
            Err(err) => {
                warn!(error = %err, "failed to read saved session");
                return Session::signed_out();
            }
        };
        match serde_json::from_str::<Option<User>>(&raw) {
            Ok(user) => Session { user },
            Err(err) => {
                warn!(error = %err, "saved session is unreadable; signing out");
                Session::signed_out()
            }
        }
    }

    pub fn sign_in(&self, email: &str) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(ChemventoryError::InvalidInput(
                "An email is required to sign in".to_string(),
            ));
        }
        let user = User::from_email(email);
        self.store.set(AUTH_USER_KEY, &serde_json::to_string(&user)?)?;
        Ok(Session { user: Some(user) })
    }

    pub fn sign_out(&self) -> Result<Session> {
        self.store.remove(AUTH_USER_KEY)?;
        Ok(Session::signed_out())
    }
}
