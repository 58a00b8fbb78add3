//! Hosted auth backend abstraction.
//!
//! Everything that touches credentials, sessions or profiles goes through
//! [`AuthBackend`]. The login procedure, router and recovery flow only
//! sequence calls against it, which keeps them testable without a network.
//!
//! [`http::HttpBackend`] talks to a GoTrue/PostgREST-compatible service.

pub mod http;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::types::{AuthUser, Role, Session, SessionEvent, UserProfile};

use crate::errors::BackendError;
use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::broadcast;

/// Capacity of the session event channel. Events are rare (one per sign-in,
/// sign-out or recovery link), so a small buffer is enough.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Password sign-in. On success the backend holds the new session.
    async fn sign_in(&self, identifier: &str, secret: &SecretString)
    -> Result<Session, BackendError>;

    /// Destroys the current session, if any.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// The session currently held by the backend client.
    async fn current_session(&self) -> Option<Session>;

    /// Subscribes to session change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// Updates the password of the user owning the current session.
    async fn update_password(&self, new_secret: &SecretString) -> Result<(), BackendError>;

    /// Sends a password reset e-mail whose link lands on `redirect_to`.
    async fn send_password_reset_email(
        &self,
        identifier: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError>;

    /// Looks up the profile for a user. `Ok(None)` means no row exists.
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError>;
}
