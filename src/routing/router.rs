use super::{Location, Navigation, PageClass, RouteAction};
use crate::{
    auth::is_authorized_for_site,
    backend::{AuthBackend, Session},
    config::SiteConfig,
    errors::Denial,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Pure part of the routing table. `ResolveRole` needs a profile lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    RedirectToLogin,
    ResolveRole,
    ShowRecovery,
    Welcome,
    ShowLoginForm,
    Stay,
}

/// First match wins.
pub(crate) fn decide(has_session: bool, class: PageClass, recovery: bool) -> Decision {
    match (has_session, class) {
        (false, class) if class.is_protected() => Decision::RedirectToLogin,
        (true, class) if class.is_protected() => Decision::Welcome,
        (true, PageClass::Login) if !recovery => Decision::ResolveRole,
        (true, PageClass::Login) => Decision::ShowRecovery,
        (false, PageClass::Login) => Decision::ShowLoginForm,
        _ => Decision::Stay,
    }
}

pub struct SessionRouter<B: ?Sized> {
    backend: Arc<B>,
    config: Arc<SiteConfig>,
}

impl<B: AuthBackend + ?Sized> SessionRouter<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, config: Arc<SiteConfig>) -> Self {
        Self { backend, config }
    }

    /// Decides what the page at `location` should do with the current session.
    #[instrument(skip(self, location), fields(path = %location.path()))]
    pub async fn route(&self, location: &Location) -> RouteAction {
        let session = self.backend.current_session().await;
        let class = PageClass::classify(location.path(), self.config.pages());
        let decision = decide(session.is_some(), class, location.is_recovery());
        debug!(?class, ?decision, "route decision");

        match (decision, session) {
            (Decision::RedirectToLogin, _) => self.redirect(location, &self.config.pages().login.href),
            (Decision::ResolveRole, Some(session)) => self.route_signed_in(location, &session).await,
            (Decision::ShowRecovery, _) => RouteAction::ShowRecovery,
            (Decision::Welcome, session) => RouteAction::Welcome {
                identifier: session
                    .as_ref()
                    .and_then(Session::identifier)
                    .map(ToString::to_string),
            },
            (Decision::ShowLoginForm | Decision::ResolveRole, _) => RouteAction::ShowLoginForm,
            (Decision::Stay, _) => RouteAction::Stay,
        }
    }

    /// Sends a signed-in user from the login page to the dashboard matching their role.
    async fn route_signed_in(&self, location: &Location, session: &Session) -> RouteAction {
        let Some(user) = session.user.as_ref() else {
            return self.reject(Denial::InvalidSession).await;
        };

        let profile = match self.backend.fetch_profile(&user.id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return self.reject(Denial::ProfileNotFound).await,
            Err(err) => {
                error!(user_id = %user.id, "Profile lookup failed: {err}");
                return self.reject(Denial::ProfileNotFound).await;
            }
        };

        if !is_authorized_for_site(&profile, self.config.tenant()) {
            return self.reject(Denial::TenantMismatch).await;
        }

        let pages = self.config.pages();
        let href = if profile.role.looks_like_super_admin() {
            &pages.superadmin.href
        } else {
            &pages.dashboard.href
        };
        info!(user_id = %user.id, role = %profile.role, "Routing to dashboard");
        self.redirect(location, href)
    }

    async fn reject(&self, denial: Denial) -> RouteAction {
        debug_assert!(denial.followed_sign_in());
        info!("Signing out session that is not valid for this site: {denial}");
        if let Err(err) = self.backend.sign_out().await {
            error!("Sign-out failed: {err}");
        }
        RouteAction::Rejected(denial)
    }

    fn redirect(&self, location: &Location, href: &str) -> RouteAction {
        RouteAction::Redirect(Navigation::replace(location.resolve(href)))
    }
}
