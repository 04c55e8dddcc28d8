//! Login state and navigation for the dashboard.
//!
//! A [`Session`] moves through three states:
//! - `Anonymous` → landing page
//! - `LoginPrompted` → login form
//! - `Authenticated` → dashboard views
//!
//! The logged-in user is mirrored to [`UserStorage`] under [`USER_STORAGE_KEY`]
//! so a reload restores it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::SessionError;
use crate::storage::UserStorage;

pub const USER_STORAGE_KEY: &str = "user";

/// Logged-in user as returned by the backend.
/// Fields other than `email` are kept verbatim in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            profile: Map::new(),
        }
    }

    /// `name` from the profile if present, else the email.
    pub fn display_name(&self) -> &str {
        self.profile
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Pages available once logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Optimizer,
}

impl View {
    pub const ALL: [View; 2] = [View::Dashboard, View::Optimizer];

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Optimizer => "Prompt Optimizer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Anonymous,
    LoginPrompted,
    Authenticated(User),
}

impl AuthState {
    fn describe(&self) -> &'static str {
        match self {
            AuthState::Anonymous => "anonymous",
            AuthState::LoginPrompted => "login is prompted",
            AuthState::Authenticated(_) => "logged in",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    auth: AuthState,
    view: View,
}

impl Session {
    /// Restore the session from storage.
    ///
    /// A missing entry yields an anonymous session. An unreadable or corrupt
    /// entry is logged, removed, and also yields an anonymous session.
    pub fn restore<S: UserStorage>(storage: &S) -> Self {
        let saved = match storage.get(USER_STORAGE_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Could not read saved user: {}", e);
                return Self::default();
            }
        };

        let Some(raw) = saved else {
            return Self::default();
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                Self {
                    auth: AuthState::Authenticated(user),
                    view: View::default(),
                }
            }
            Err(e) => {
                warn!("Discarding corrupt saved user: {}", e);
                if let Err(e) = storage.remove(USER_STORAGE_KEY) {
                    warn!("Failed to remove corrupt saved user: {}", e);
                }
                Self::default()
            }
        }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn user(&self) -> Option<&User> {
        match &self.auth {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Landing page "log in" click. Repeating it while the form is shown is harmless.
    pub fn request_login(&mut self) -> Result<(), SessionError> {
        match self.auth {
            AuthState::Anonymous | AuthState::LoginPrompted => {
                self.auth = AuthState::LoginPrompted;
                Ok(())
            }
            AuthState::Authenticated(_) => Err(self.invalid("request login")),
        }
    }

    /// Accept a user from a successful login and persist it.
    ///
    /// Only valid from the login form. If the user cannot be persisted the
    /// session stays on the login form.
    pub fn login<S: UserStorage>(&mut self, storage: &S, user: User) -> Result<(), SessionError> {
        if self.auth != AuthState::LoginPrompted {
            return Err(self.invalid("log in"));
        }

        let json = serde_json::to_string(&user).map_err(|e| SessionError::Serialize(e.to_string()))?;
        storage.set(USER_STORAGE_KEY, &json)?;

        info!("Logged in as {}", user.email);
        self.auth = AuthState::Authenticated(user);
        self.view = View::default();
        Ok(())
    }

    /// Forget the user and return to the landing page.
    ///
    /// Storage is cleared first; if that fails the session stays logged in.
    pub fn logout<S: UserStorage>(&mut self, storage: &S) -> Result<(), SessionError> {
        let AuthState::Authenticated(user) = &self.auth else {
            return Err(self.invalid("log out"));
        };
        storage.remove(USER_STORAGE_KEY)?;
        info!("Logged out {}", user.email);

        self.auth = AuthState::Anonymous;
        self.view = View::default();
        Ok(())
    }

    pub fn navigate(&mut self, view: View) -> Result<(), SessionError> {
        if !self.is_authenticated() {
            return Err(self.invalid("navigate"));
        }
        self.view = view;
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.auth.describe(),
        }
    }
}
