//! Password recovery flow.
//!
//! A recovery link signs the user in with a short-lived session and the
//! backend emits [`SessionEvent::RecoveryInitiated`]. Handing that event to the
//! flow swaps the login form for the reset form; exactly one of the two is
//! visible at any time. After a successful update the page reloads without the
//! recovery marker so normal routing takes over again.

use crate::{
    backend::{AuthBackend, SessionEvent},
    config::SiteConfig,
    errors::ResetError,
    routing::{Location, Navigation},
};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{info, instrument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    LoginForm,
    ResetForm,
}

/// A completed password update, waiting for the scheduled reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetOutcome {
    pub reload: Navigation,
    pub after: Duration,
}

pub struct RecoveryFlow<B: ?Sized> {
    backend: Arc<B>,
    config: Arc<SiteConfig>,
    view: watch::Sender<ViewState>,
}

impl<B: AuthBackend + ?Sized> RecoveryFlow<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, config: Arc<SiteConfig>) -> Self {
        let (view, _) = watch::channel(ViewState::LoginForm);
        Self {
            backend,
            config,
            view,
        }
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        *self.view.borrow()
    }

    /// Applies a session event. Returns the new view when it changed.
    pub fn handle_event(&self, event: &SessionEvent) -> Option<ViewState> {
        match event {
            SessionEvent::RecoveryInitiated(_) => {
                let changed = self.view.send_if_modified(|view| {
                    let changed = *view != ViewState::ResetForm;
                    *view = ViewState::ResetForm;
                    changed
                });
                if changed {
                    info!("Password recovery initiated");
                }
                changed.then_some(ViewState::ResetForm)
            }
            SessionEvent::SignedIn(_) | SessionEvent::SignedOut => None,
        }
    }

    /// Validates and submits the new password from the reset form.
    ///
    /// # Errors
    /// - `ResetError::TooShort` when the password is under the minimum length; the backend is not called.
    /// - `ResetError::NotInRecovery` when the reset form is not showing.
    /// - `ResetError::Backend` when the backend rejects the update.
    #[instrument(skip(self, new_secret, location))]
    pub async fn submit_new_password(
        &self,
        new_secret: &SecretString,
        location: &Location,
    ) -> Result<ResetOutcome, ResetError> {
        let min = self.config.min_password_chars();
        if new_secret.expose_secret().chars().count() < min {
            return Err(ResetError::TooShort { min });
        }
        if self.view() != ViewState::ResetForm {
            return Err(ResetError::NotInRecovery);
        }

        self.backend
            .update_password(new_secret)
            .await
            .map_err(ResetError::Backend)?;

        info!("Password updated");
        Ok(ResetOutcome {
            reload: Navigation::replace(location.without_fragment()),
            after: self.config.recovery_reload_delay(),
        })
    }

    /// Waits out the reload delay, then returns to the login form and yields
    /// the reload navigation that re-runs normal routing.
    pub async fn complete(&self, outcome: ResetOutcome) -> Navigation {
        tokio::time::sleep(outcome.after).await;
        self.view.send_replace(ViewState::LoginForm);
        outcome.reload
    }
}
