//! Login credentials and the session token handed to the HTTP client.

use std::env;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::error::{LeadError, Result};

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV: &str = "LEADDESK_TOKEN";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Shown for any rejected login, whatever the server said.
pub const LOGIN_FAILED: &str = "Username or password is incorrect";

/// Validated username and password.
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Validate raw input. The username is trimmed; the password is taken as
    /// typed.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LeadError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(LeadError::Validation("Password is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LeadError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(Self {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The signed-in user's token and display name.
///
/// Built once from configuration and passed to whatever needs it; nothing
/// reads the token from ambient state later on.
#[derive(Default)]
pub struct AuthSession {
    token: Option<SecretString>,
    display_name: Option<String>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            display_name,
        }
    }

    /// Session from `LEADDESK_TOKEN` if set and non-empty, else from the
    /// stored config.
    pub fn from_config(config: &Config) -> Self {
        let display_name = config.auth.name.clone();
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Self::new(token, display_name);
        }
        match &config.auth.token {
            Some(token) if !token.is_empty() => Self::new(token.clone(), display_name),
            _ => Self::anonymous(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Fail with [`LeadError::NotLoggedIn`] when there is no token.
    pub fn require(&self) -> Result<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(LeadError::NotLoggedIn)
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("display_name", &self.display_name)
            .finish()
    }
}
