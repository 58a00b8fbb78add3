//! In-memory backend used by unit tests. Records every call so tests can
//! assert that a procedure did (or did not) reach the backend.

use super::{AuthBackend, AuthUser, EVENT_CHANNEL_CAPACITY, Session, SessionEvent, UserProfile};
use crate::errors::BackendError;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

#[derive(Default)]
pub struct CallCounts {
    pub sign_in: AtomicUsize,
    pub sign_out: AtomicUsize,
    pub fetch_profile: AtomicUsize,
    pub update_password: AtomicUsize,
    pub reset_email: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.sign_in.load(Ordering::SeqCst)
            + self.sign_out.load(Ordering::SeqCst)
            + self.fetch_profile.load(Ordering::SeqCst)
            + self.update_password.load(Ordering::SeqCst)
            + self.reset_email.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend {
    pub calls: CallCounts,
    sign_in_result: Mutex<Result<Option<AuthUser>, BackendError>>,
    profile_result: Mutex<Result<Option<UserProfile>, BackendError>>,
    sign_out_error: Mutex<Option<BackendError>>,
    update_error: Mutex<Option<BackendError>>,
    reset_error: Mutex<Option<BackendError>>,
    session: Mutex<Option<Session>>,
    pub last_reset: Mutex<Option<(String, String)>>,
    events: broadcast::Sender<SessionEvent>,
}

impl FakeBackend {
    /// Backend that accepts any credentials for user `u1`.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            calls: CallCounts::default(),
            sign_in_result: Mutex::new(Ok(Some(user()))),
            profile_result: Mutex::new(Ok(None)),
            sign_out_error: Mutex::new(None),
            update_error: Mutex::new(None),
            reset_error: Mutex::new(None),
            session: Mutex::new(None),
            last_reset: Mutex::new(None),
            events,
        }
    }

    pub fn with_profile(self, tenant_id: Option<&str>, role: &str) -> Self {
        self.set_profile(Ok(Some(UserProfile {
            tenant_id: tenant_id.map(ToString::to_string),
            role: super::Role::parse(role),
        })));
        self
    }

    pub fn with_sign_in_error(self, message: &str) -> Self {
        *lock(&self.sign_in_result) = Err(BackendError::Http {
            status: 400,
            message: message.to_string(),
        });
        self
    }

    pub fn with_sign_in_without_user(self) -> Self {
        *lock(&self.sign_in_result) = Ok(None);
        self
    }

    pub fn with_sign_out_error(self) -> Self {
        *lock(&self.sign_out_error) = Some(BackendError::Network("offline".to_string()));
        self
    }

    pub fn with_update_error(self, message: &str) -> Self {
        *lock(&self.update_error) = Some(BackendError::Http {
            status: 422,
            message: message.to_string(),
        });
        self
    }

    pub fn with_reset_error(self) -> Self {
        *lock(&self.reset_error) = Some(BackendError::Http {
            status: 429,
            message: "rate limited".to_string(),
        });
        self
    }

    pub fn with_session(self) -> Self {
        *lock(&self.session) = Some(session());
        self
    }

    pub fn set_profile(&self, result: Result<Option<UserProfile>, BackendError>) {
        *lock(&self.profile_result) = result;
    }

    pub fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn user() -> AuthUser {
    AuthUser {
        id: "u1".to_string(),
        email: Some("a@x.com".to_string()),
    }
}

pub fn session() -> Session {
    Session::new(SecretString::from("access".to_string()), Some(user()))
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn sign_in(
        &self,
        _identifier: &str,
        _secret: &SecretString,
    ) -> Result<Session, BackendError> {
        self.calls.sign_in.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent attempts can observe the in-flight state.
        tokio::task::yield_now().await;
        let user = lock(&self.sign_in_result).clone()?;
        let session = Session::new(SecretString::from("access".to_string()), user);
        *lock(&self.session) = Some(session.clone());
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.calls.sign_out.fetch_add(1, Ordering::SeqCst);
        *lock(&self.session) = None;
        self.emit(SessionEvent::SignedOut);
        match lock(&self.sign_out_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn current_session(&self) -> Option<Session> {
        lock(&self.session).clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn update_password(&self, _new_secret: &SecretString) -> Result<(), BackendError> {
        self.calls.update_password.fetch_add(1, Ordering::SeqCst);
        match lock(&self.update_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send_password_reset_email(
        &self,
        identifier: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError> {
        self.calls.reset_email.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_reset) = Some((identifier.to_string(), redirect_to.to_string()));
        match lock(&self.reset_error).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn fetch_profile(&self, _user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        self.calls.fetch_profile.fetch_add(1, Ordering::SeqCst);
        lock(&self.profile_result).clone()
    }
}
