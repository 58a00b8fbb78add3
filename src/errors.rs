//! Error types for the login gate. Denials are expected outcomes of a login
//! attempt and carry user-facing text; backend errors describe failed calls to
//! the hosted auth service. Neither carries secrets.

use thiserror::Error;

/// Why a login attempt did not produce an authorized session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Denial {
    #[error("Email and password are required.")]
    MissingCredentials,
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Invalid session.")]
    InvalidSession,
    #[error("User profile not found.")]
    ProfileNotFound,
    #[error("Your account is not registered for this site.")]
    TenantMismatch,
    #[error("A login attempt is already in progress.")]
    AttemptInProgress,
}

impl Denial {
    /// Whether the denial happened after the backend had already created a session.
    #[must_use]
    pub const fn followed_sign_in(&self) -> bool {
        matches!(
            self,
            Self::InvalidSession | Self::ProfileNotFound | Self::TenantMismatch
        )
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("No active session")]
    NoSession,
}

impl BackendError {
    /// Message suitable for showing to the user; HTTP errors surface the backend text verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Why a new password from the reset form was not accepted.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResetError {
    #[error("Password must be at least {min} characters.")]
    TooShort { min: usize },
    #[error("No password recovery is in progress.")]
    NotInRecovery,
    #[error("Failed to update password: {}", .0.user_message())]
    Backend(BackendError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Site configuration error: tenant identifier is not set.")]
    MissingTenant,
    #[error("Site configuration error: invalid URL: {0}")]
    InvalidUrl(String),
}
