//! Page controller. Wires the login procedure, session router, recovery flow
//! and account actions to a [`Ui`] and turns their outcomes into status
//! messages, form changes and navigation.

use crate::{
    account,
    auth::{Credentials, LoginProcedure},
    backend::{AuthBackend, SessionEvent},
    config::SiteConfig,
    errors::{ConfigError, Denial, ResetError},
    recovery::{RecoveryFlow, ViewState},
    routing::{Location, Navigation, RouteAction, SessionRouter},
    ui::{StatusMessage, Ui},
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

pub struct Controller<B: ?Sized, U: ?Sized> {
    backend: Arc<B>,
    ui: Arc<U>,
    config: Arc<SiteConfig>,
    login: LoginProcedure<B>,
    router: SessionRouter<B>,
    recovery: RecoveryFlow<B>,
}

impl<B, U> Controller<B, U>
where
    B: AuthBackend + ?Sized + 'static,
    U: Ui + ?Sized + 'static,
{
    #[must_use]
    pub fn new(backend: Arc<B>, ui: Arc<U>, config: SiteConfig) -> Self {
        let config = Arc::new(config);
        Self {
            login: LoginProcedure::new(backend.clone(), config.clone()),
            router: SessionRouter::new(backend.clone(), config.clone()),
            recovery: RecoveryFlow::new(backend.clone(), config.clone()),
            backend,
            ui,
            config,
        }
    }

    /// Like [`Controller::new`], but renders an unusable configuration as a
    /// fatal error instead of starting.
    ///
    /// # Errors
    /// Returns the configuration error after it has been rendered.
    pub fn try_new(
        backend: Arc<B>,
        ui: Arc<U>,
        config: Result<SiteConfig, ConfigError>,
    ) -> Result<Self, ConfigError> {
        match config {
            Ok(config) => Ok(Self::new(backend, ui, config)),
            Err(err) => {
                ui.render_fatal(&err.to_string());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.recovery.view()
    }

    /// Runs the router for the page that just loaded and applies the result.
    #[instrument(skip_all)]
    pub async fn page_load(&self, location: &Location) -> RouteAction {
        self.ui.show_loading(true);
        let action = self.router.route(location).await;
        self.ui.show_loading(false);
        self.apply(&action);
        action
    }

    /// Handles the login form submit. On success the page is routed again so
    /// the user lands on the dashboard for their role; the applied action is
    /// returned.
    ///
    /// # Errors
    /// Returns the [`Denial`] after it has been shown as a status message.
    #[instrument(skip_all)]
    pub async fn submit_login(
        &self,
        credentials: &Credentials,
        location: &Location,
    ) -> Result<RouteAction, Denial> {
        // The running attempt owns the loading indicator.
        if self.login.is_in_flight() {
            let denial = Denial::AttemptInProgress;
            self.ui.show_status(&login_failure(&denial));
            return Err(denial);
        }

        self.ui.show_loading(true);
        let result = self.login.attempt(credentials).await;

        match result {
            Ok(_session) => {
                let action = self.router.route(location).await;
                self.ui.show_loading(false);
                self.ui
                    .show_status(&StatusMessage::success("Login successful."));
                self.apply(&action);
                Ok(action)
            }
            Err(Denial::AttemptInProgress) => {
                // Lost the race after the check above; the winner still owns the indicator.
                let denial = Denial::AttemptInProgress;
                self.ui.show_status(&login_failure(&denial));
                Err(denial)
            }
            Err(denial) => {
                self.ui.show_loading(false);
                self.ui.show_status(&login_failure(&denial));
                Err(denial)
            }
        }
    }

    pub async fn logout(&self, location: &Location) -> Option<Navigation> {
        account::logout(
            self.backend.as_ref(),
            self.ui.as_ref(),
            location,
            self.config.pages(),
        )
        .await
    }

    pub async fn forgot_password(&self, identifier: &str, location: &Location) {
        account::request_password_reset(self.backend.as_ref(), self.ui.as_ref(), identifier, location)
            .await;
    }

    /// Feeds a session event to the recovery flow and re-renders on change.
    pub fn handle_session_event(&self, event: &SessionEvent) {
        if let Some(view) = self.recovery.handle_event(event) {
            self.ui.render(view);
            if view == ViewState::ResetForm {
                self.ui
                    .show_status(&StatusMessage::info("Enter a new password for your account."));
            }
        }
    }

    /// Spawns the standing session-event listener. The task ends when the
    /// backend drops its event channel.
    pub fn listen(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut events = controller.backend.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => controller.handle_session_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Controller lagged, skipped {skipped} session events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Handles the reset form submit, waits out the reload delay and navigates
    /// back to the page without the recovery marker.
    ///
    /// # Errors
    /// Returns the [`ResetError`] after it has been shown as a status message.
    #[instrument(skip_all)]
    pub async fn submit_new_password(
        &self,
        new_secret: &SecretString,
        location: &Location,
    ) -> Result<Navigation, ResetError> {
        self.ui.show_loading(true);
        let result = self.recovery.submit_new_password(new_secret, location).await;
        self.ui.show_loading(false);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.ui.show_status(&StatusMessage::error(err.to_string()));
                return Err(err);
            }
        };

        self.ui.show_status(&StatusMessage::success(format!(
            "Password updated. Reloading in {} seconds.",
            outcome.after.as_secs()
        )));
        let reload = self.recovery.complete(outcome).await;
        self.ui.render(ViewState::LoginForm);
        self.ui.navigate(&reload);
        Ok(reload)
    }

    fn apply(&self, action: &RouteAction) {
        match action {
            RouteAction::Redirect(navigation) => self.ui.navigate(navigation),
            RouteAction::ShowRecovery => debug!("Waiting for recovery event"),
            RouteAction::Welcome { identifier } => {
                if let Some(identifier) = identifier {
                    self.ui.welcome(identifier);
                }
            }
            RouteAction::ShowLoginForm => self.ui.render(ViewState::LoginForm),
            RouteAction::Rejected(denial) => {
                info!("Existing session rejected for this site");
                self.ui.show_status(&login_failure(denial));
                self.ui.render(ViewState::LoginForm);
            }
            RouteAction::Stay => {}
        }
    }
}

/// Form validation messages stand alone; everything else is a failed login.
fn login_failure(denial: &Denial) -> StatusMessage {
    match denial {
        Denial::MissingCredentials | Denial::AttemptInProgress => {
            StatusMessage::error(denial.to_string())
        }
        _ => StatusMessage::error(format!("Login failed: {denial}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::test_support::{FakeBackend, session};
    use crate::ui::StatusKind;
    use crate::ui::test_support::{RecordingUi, UiEvent};
    use std::time::Duration;

    fn controller(
        backend: Arc<FakeBackend>,
        ui: Arc<RecordingUi>,
    ) -> Controller<FakeBackend, RecordingUi> {
        let config = SiteConfig::from_tenant(Some("school-1")).unwrap();
        Controller::new(backend, ui, config)
    }

    fn login_page() -> Location {
        Location::parse("https://s.example/login.html").unwrap()
    }

    #[test]
    fn missing_tenant_renders_fatal() {
        let ui = Arc::new(RecordingUi::answering(true));
        let result = Controller::try_new(
            Arc::new(FakeBackend::new()),
            ui.clone(),
            SiteConfig::from_tenant(None),
        );
        assert_eq!(result.err(), Some(ConfigError::MissingTenant));
        assert_eq!(
            ui.events(),
            vec![UiEvent::Fatal(ConfigError::MissingTenant.to_string())]
        );
    }

    #[tokio::test]
    async fn successful_login_redirects_by_role() {
        let backend = Arc::new(FakeBackend::new().with_profile(None, "super_admin"));
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(backend, ui.clone());

        let result = controller
            .submit_login(&Credentials::new("a@x.com", "secret"), &login_page())
            .await;
        assert!(result.is_ok());
        assert_eq!(
            ui.navigations(),
            vec![Navigation::replace(
                "https://s.example/superadmin.html".to_string()
            )]
        );
        assert_eq!(ui.last_status().unwrap().kind, StatusKind::Success);
        assert!(ui.loading_balanced());
    }

    #[tokio::test]
    async fn concurrent_submit_leaves_first_attempt_indicator_alone() {
        let backend = Arc::new(FakeBackend::new().with_profile(None, "super_admin"));
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(backend.clone(), ui.clone());
        let credentials = Credentials::new("a@x.com", "secret");

        let first_page = login_page();
        let second_page = login_page();
        let (first, second) = tokio::join!(
            controller.submit_login(&credentials, &first_page),
            controller.submit_login(&credentials, &second_page),
        );
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), Denial::AttemptInProgress);
        assert_eq!(FakeBackend::count(&backend.calls.sign_in), 1);

        let loading: Vec<_> = ui
            .events()
            .into_iter()
            .filter(|event| matches!(event, UiEvent::Loading(_)))
            .collect();
        assert_eq!(loading, vec![UiEvent::Loading(true), UiEvent::Loading(false)]);
        assert!(ui.loading_balanced());
    }

    #[tokio::test]
    async fn tenant_mismatch_is_reported() {
        let backend = Arc::new(FakeBackend::new().with_profile(Some("school-2"), "teacher"));
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(backend.clone(), ui.clone());

        let result = controller
            .submit_login(&Credentials::new("a@x.com", "secret"), &login_page())
            .await;
        assert_eq!(result.unwrap_err(), Denial::TenantMismatch);
        assert_eq!(
            ui.last_status().unwrap().text,
            "Login failed: Your account is not registered for this site."
        );
        assert!(ui.navigations().is_empty());
        assert!(ui.loading_balanced());
        assert!(backend.current_session().await.is_none());
    }

    #[tokio::test]
    async fn missing_fields_message_has_no_prefix() {
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(Arc::new(FakeBackend::new()), ui.clone());

        let _ = controller
            .submit_login(&Credentials::new("a@x.com", ""), &login_page())
            .await;
        assert_eq!(
            ui.last_status().unwrap().text,
            "Email and password are required."
        );
    }

    #[tokio::test]
    async fn page_load_without_session_shows_login_form() {
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(Arc::new(FakeBackend::new()), ui.clone());

        let action = controller.page_load(&login_page()).await;
        assert_eq!(action, RouteAction::ShowLoginForm);
        assert!(ui.events().contains(&UiEvent::Render(ViewState::LoginForm)));

        let dashboard = Location::parse("https://s.example/dashboard.html").unwrap();
        controller.page_load(&dashboard).await;
        assert_eq!(
            ui.navigations(),
            vec![Navigation::replace("https://s.example/login.html".to_string())]
        );
    }

    #[tokio::test]
    async fn page_load_on_protected_page_welcomes_user() {
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(Arc::new(FakeBackend::new().with_session()), ui.clone());

        let dashboard = Location::parse("https://s.example/dashboard.html").unwrap();
        controller.page_load(&dashboard).await;
        assert!(ui.events().contains(&UiEvent::Welcome("a@x.com".to_string())));
    }

    #[tokio::test]
    async fn listener_renders_reset_form_on_recovery() {
        let backend = Arc::new(FakeBackend::new());
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = Arc::new(controller(backend.clone(), ui.clone()));
        let listener = controller.listen();

        backend.emit(SessionEvent::RecoveryInitiated(session()));
        for _ in 0..100 {
            if controller.view() == ViewState::ResetForm {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.view(), ViewState::ResetForm);
        listener.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn reset_submit_reloads_after_delay() {
        let backend = Arc::new(FakeBackend::new());
        let ui = Arc::new(RecordingUi::answering(true));
        let controller = controller(backend, ui.clone());
        let location =
            Location::parse("https://s.example/login.html#access_token=t&type=recovery").unwrap();

        controller.handle_session_event(&SessionEvent::RecoveryInitiated(session()));
        assert!(ui.events().contains(&UiEvent::Render(ViewState::ResetForm)));

        let short = controller
            .submit_new_password(&SecretString::from("ab".to_string()), &location)
            .await;
        assert_eq!(short, Err(ResetError::TooShort { min: 6 }));
        assert_eq!(
            ui.last_status().unwrap().text,
            "Password must be at least 6 characters."
        );

        let started = tokio::time::Instant::now();
        let reload = controller
            .submit_new_password(&SecretString::from("abcdef".to_string()), &location)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(
            reload,
            Navigation::replace("https://s.example/login.html".to_string())
        );
        assert_eq!(controller.view(), ViewState::LoginForm);
        assert!(ui.loading_balanced());
    }
}
