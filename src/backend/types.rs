//! Session and profile types returned by the auth backend. Sessions carry
//! bearer tokens, so `Debug` is implemented by hand and never prints them.

use secrecy::SecretString;
use std::fmt;

/// Identity attached to a backend session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Opaque backend session. Created and destroyed by the backend only.
#[derive(Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Unix seconds.
    pub expires_at: Option<u64>,
    pub user: Option<AuthUser>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: SecretString, user: Option<AuthUser>) -> Self {
        Self {
            access_token,
            refresh_token: None,
            expires_at: None,
            user,
        }
    }

    #[must_use]
    pub fn with_refresh_token(mut self, token: Option<SecretString>) -> Self {
        self.refresh_token = token;
        self
    }

    #[must_use]
    pub fn with_expires_at(mut self, expires_at: Option<u64>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Label shown in the welcome indicator: the e-mail when known, else the user id.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.email.as_deref().unwrap_or(&user.id))
    }

    #[must_use]
    pub fn is_expired(&self, now_unix: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now_unix)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Profile role, kept exactly as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub const SUPER_ADMIN: &'static str = "super_admin";

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match; this is what grants cross-tenant access.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.0 == Self::SUPER_ADMIN
    }

    /// Case- and whitespace-insensitive match, used only to pick the admin
    /// dashboard for a session that already passed the access check.
    #[must_use]
    pub fn looks_like_super_admin(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(Self::SUPER_ADMIN)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub tenant_id: Option<String>,
    pub role: Role,
}

/// Out-of-band session notifications delivered by the backend.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    RecoveryInitiated(Session),
}
