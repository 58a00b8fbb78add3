use super::{Credentials, access::is_authorized_for_site};
use crate::{
    backend::{AuthBackend, Session},
    config::SiteConfig,
    errors::Denial,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, error, info, instrument, warn};

/// Runs one login attempt at a time against the backend and enforces the
/// site-access check on the resulting session.
pub struct LoginProcedure<B: ?Sized> {
    backend: Arc<B>,
    config: Arc<SiteConfig>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: AuthBackend + ?Sized> LoginProcedure<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, config: Arc<SiteConfig>) -> Self {
        Self {
            backend,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Attempts a login and returns the live session only when the user may use this site.
    ///
    /// # Errors
    /// Returns a [`Denial`] describing why the login was refused. Denials raised
    /// after a successful sign-in have already signed the new session out.
    #[instrument(level = "debug", skip(self, credentials), fields(identifier = %credentials.identifier))]
    pub async fn attempt(&self, credentials: &Credentials) -> Result<Session, Denial> {
        if credentials.is_incomplete() {
            return Err(Denial::MissingCredentials);
        }

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("Rejected concurrent login attempt");
            return Err(Denial::AttemptInProgress);
        };

        let session = self
            .backend
            .sign_in(&credentials.identifier, &credentials.secret)
            .await
            .map_err(|err| Denial::InvalidCredentials(err.user_message()))?;

        let Some(user) = session.user.clone() else {
            error!("Backend returned a session without a user");
            return Err(self.deny(Denial::InvalidSession).await);
        };

        let profile = match self.backend.fetch_profile(&user.id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(user_id = %user.id, "No profile row");
                return Err(self.deny(Denial::ProfileNotFound).await);
            }
            Err(err) => {
                error!(user_id = %user.id, "Profile lookup failed: {err}");
                return Err(self.deny(Denial::ProfileNotFound).await);
            }
        };

        if !is_authorized_for_site(&profile, self.config.tenant()) {
            info!(user_id = %user.id, role = %profile.role, "Account belongs to another tenant");
            return Err(self.deny(Denial::TenantMismatch).await);
        }

        info!(user_id = %user.id, role = %profile.role, "Login authorized");
        Ok(session)
    }

    /// Signs out the session created by this attempt before reporting the denial.
    /// A failed sign-out is logged; the denial reason stays the same.
    async fn deny(&self, denial: Denial) -> Denial {
        debug_assert!(denial.followed_sign_in());
        if let Err(err) = self.backend.sign_out().await {
            error!("Compensating sign-out failed: {err}");
        }
        denial
    }
}
