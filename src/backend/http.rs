//! HTTP client for GoTrue/PostgREST-compatible auth backends.
//!
//! Auth calls go to `/auth/v1/*`, profile lookups to `/rest/v1/<table>`. Every
//! request carries the project `apikey` header; session-scoped calls add the
//! access token as a bearer token so row-level security applies. Tokens and
//! passwords are never logged.

use super::{
    AuthBackend, AuthUser, EVENT_CHANNEL_CAPACITY, Role, Session, SessionEvent, UserProfile,
    store::SessionStore,
};
use crate::{APP_USER_AGENT, config::BackendConfig, errors::BackendError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, instrument, warn};
use url::{Url, form_urlencoded};

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    expires_at: Option<u64>,
    user: Option<UserResponse>,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

impl From<UserResponse> for AuthUser {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
    session: RwLock<Option<Session>>,
    store: Option<SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpBackend {
    /// Builds the client and restores a persisted session when a session file is configured.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the session file is unreadable.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let store = config.session_file.clone().map(SessionStore::new);
        let restored = match &store {
            Some(store) => store.load()?,
            None => None,
        };

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            config,
            session: RwLock::new(restored),
            store,
            events,
        })
    }

    /// Consumes the token fragment of an auth redirect (e-mail links land on the
    /// page with `#access_token=...&type=recovery`). Installs the session and
    /// emits `RecoveryInitiated` for recovery links, `SignedIn` otherwise.
    /// Returns `Ok(None)` when the URL carries no auth fragment.
    ///
    /// # Errors
    /// Returns `BackendError::Http` when the fragment reports an error (for example
    /// an expired link) or the token cannot be resolved to a user.
    #[instrument(skip(self, page_url))]
    pub async fn ingest_redirect(&self, page_url: &Url) -> Result<Option<SessionEvent>, BackendError> {
        let Some(fragment) = page_url.fragment() else {
            return Ok(None);
        };
        let params: Vec<(String, String)> = form_urlencoded::parse(fragment.as_bytes())
            .into_owned()
            .collect();
        let param = |key: &str| {
            params
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };

        if let Some(err) = param("error") {
            let message = param("error_description").unwrap_or(err);
            return Err(BackendError::Http {
                status: 401,
                message: truncate(&message),
            });
        }

        let Some(access_token) = param("access_token") else {
            return Ok(None);
        };
        let access_token = SecretString::from(access_token);
        let user = self.fetch_user(&access_token).await?;

        let expires_at = param("expires_at")
            .and_then(|value| value.parse().ok())
            .or_else(|| {
                param("expires_in")
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(|seconds| now_unix() + seconds)
            });

        let session = Session::new(access_token, Some(user))
            .with_refresh_token(param("refresh_token").map(SecretString::from))
            .with_expires_at(expires_at);

        self.install(session.clone()).await;

        let event = if param("type").as_deref() == Some("recovery") {
            SessionEvent::RecoveryInitiated(session)
        } else {
            SessionEvent::SignedIn(session)
        };
        let _ = self.events.send(event.clone());

        Ok(Some(event))
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.config
            .base_url
            .join(path)
            .map_err(|err| BackendError::Parse(format!("invalid endpoint {path}: {err}")))
    }

    fn with_api_key(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", self.config.api_key.expose_secret())
    }

    async fn bearer(&self) -> Option<SecretString> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    async fn install(&self, session: Session) {
        if let Some(store) = &self.store
            && let Err(err) = store.save(&session)
        {
            warn!("Failed to persist session: {err:#}");
        }
        *self.session.write().await = Some(session);
    }

    async fn clear(&self) {
        *self.session.write().await = None;
        if let Some(store) = &self.store
            && let Err(err) = store.clear()
        {
            warn!("Failed to remove persisted session: {err:#}");
        }
    }

    async fn fetch_user(&self, access_token: &SecretString) -> Result<AuthUser, BackendError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .with_api_key(self.client.get(url))
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let user: UserResponse = response.json().await?;
        Ok(user.into())
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    #[instrument(level = "debug", skip(self, secret))]
    async fn sign_in(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<Session, BackendError> {
        let url = self.endpoint("auth/v1/token")?;
        let response = self
            .with_api_key(self.client.post(url))
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": identifier,
                "password": secret.expose_secret(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            debug!("sign-in rejected: {err}");
            return Err(err);
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|seconds| now_unix() + seconds));
        let session = Session::new(
            SecretString::from(token.access_token),
            token.user.map(AuthUser::from),
        )
        .with_refresh_token(token.refresh_token.map(SecretString::from))
        .with_expires_at(expires_at);

        self.install(session.clone()).await;
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));

        Ok(session)
    }

    /// Always drops the local session, even when the backend call fails.
    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), BackendError> {
        let token = self.bearer().await;
        self.clear().await;
        let _ = self.events.send(SessionEvent::SignedOut);

        let Some(token) = token else {
            return Ok(());
        };

        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .with_api_key(self.client.post(url))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let err = error_from_response(response).await;
            error!("Backend sign-out failed: {err}");
            Err(err)
        }
    }

    async fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .await
            .as_ref()
            .filter(|session| !session.is_expired(now_unix()))
            .cloned()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    #[instrument(skip(self, new_secret))]
    async fn update_password(&self, new_secret: &SecretString) -> Result<(), BackendError> {
        let token = self.bearer().await.ok_or(BackendError::NoSession)?;
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .with_api_key(self.client.put(url))
            .bearer_auth(token.expose_secret())
            .json(&json!({ "password": new_secret.expose_secret() }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn send_password_reset_email(
        &self,
        identifier: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError> {
        let url = self.endpoint("auth/v1/recover")?;
        let response = self
            .with_api_key(self.client.post(url))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": identifier }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let url = self.endpoint(&format!("rest/v1/{}", self.config.profile_table))?;
        let column = &self.config.tenant_column;
        let bearer = match self.bearer().await {
            Some(token) => token,
            None => self.config.api_key.clone(),
        };

        let response = self
            .with_api_key(self.client.get(url))
            .bearer_auth(bearer.expose_secret())
            .query(&[
                ("id", format!("eq.{user_id}")),
                ("select", format!("{column},role")),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let rows: Vec<Value> = response.json().await?;
        match rows.as_slice() {
            [] => Ok(None),
            [row] => Ok(Some(profile_from_row(row, column))),
            _ => {
                warn!(user_id, rows = rows.len(), "Ambiguous profile lookup");
                Err(BackendError::Parse(format!(
                    "expected one profile row, got {}",
                    rows.len()
                )))
            }
        }
    }
}

fn profile_from_row(row: &Value, tenant_column: &str) -> UserProfile {
    // Tenant keys may be numeric in some schemas; compare them as text.
    let tenant_id = match &row[tenant_column] {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    };
    let role = row["role"].as_str().map_or_else(|| Role::parse(""), Role::parse);

    UserProfile { tenant_id, role }
}

async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| value[*key].as_str().map(ToString::to_string))
        })
        .unwrap_or(body);
    let message = if message.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string()
    } else {
        message
    };

    BackendError::Http {
        status: status.as_u16(),
        message: truncate(&message),
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
