//! Login decision procedure and the site-access check it enforces.
//!
//! Flow Overview: credentials are checked locally, then sent to the backend.
//! A successful sign-in is followed by a fresh profile lookup; the profile must
//! either carry the `super_admin` role or belong to the configured tenant.
//! Every denial that happens after the backend created a session signs that
//! session out before the denial is returned. This module handles passwords and
//! must never log them.

pub mod access;
pub mod login;

pub use self::access::is_authorized_for_site;
pub use self::login::LoginProcedure;

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Credentials for one submit. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(identifier: &str, secret: &str) -> Self {
        Self {
            identifier: identifier.trim().to_string(),
            secret: SecretString::from(secret.to_string()),
        }
    }

    /// Either field empty means the form was not filled in.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.identifier.is_empty() || self.secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_when_either_field_is_empty() {
        assert!(Credentials::new("a@x.com", "").is_incomplete());
        assert!(Credentials::new("", "secret").is_incomplete());
        assert!(Credentials::new("   ", "secret").is_incomplete());
        assert!(!Credentials::new("a@x.com", "secret").is_incomplete());
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", Credentials::new("a@x.com", "hunter2"));
        assert!(rendered.contains("a@x.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
