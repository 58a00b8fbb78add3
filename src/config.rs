//! Site and backend configuration. Both are plain values built once at startup
//! and shared read-only with the login procedure and the router. The API key is
//! the backend's public anon key; it still goes through `SecretString` so it
//! never lands in logs.

use crate::errors::ConfigError;
use secrecy::SecretString;
use std::{fmt, path::PathBuf, time::Duration};
use url::Url;

/// Default delay before reloading the page after a successful password reset.
pub const DEFAULT_RECOVERY_RELOAD_DELAY: Duration = Duration::from_secs(3);
/// Minimum length (in characters) accepted for a new password.
pub const DEFAULT_MIN_PASSWORD_CHARS: usize = 6;

/// The tenant this site instance serves. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenantId(String);

impl TenantId {
    /// # Errors
    /// Returns `ConfigError::MissingTenant` when the value is empty or whitespace.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        normalize_value(value)
            .map(Self)
            .ok_or(ConfigError::MissingTenant)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a profile tenant, which may be null.
    #[must_use]
    pub fn matches(&self, other: Option<&str>) -> bool {
        other == Some(self.0.as_str())
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A page the router knows about: the path marker used for classification and
/// the href used when redirecting to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub marker: String,
    pub href: String,
}

impl Page {
    #[must_use]
    pub fn new(marker: &str, href: &str) -> Self {
        Self {
            marker: marker.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageNames {
    pub login: Page,
    pub dashboard: Page,
    pub superadmin: Page,
}

impl Default for PageNames {
    fn default() -> Self {
        Self {
            login: Page::new("login", "login.html"),
            dashboard: Page::new("dashboard", "dashboard.html"),
            superadmin: Page::new("superadmin", "superadmin.html"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    tenant: TenantId,
    pages: PageNames,
    recovery_reload_delay: Duration,
    min_password_chars: usize,
}

impl SiteConfig {
    #[must_use]
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            pages: PageNames::default(),
            recovery_reload_delay: DEFAULT_RECOVERY_RELOAD_DELAY,
            min_password_chars: DEFAULT_MIN_PASSWORD_CHARS,
        }
    }

    /// Builds the config from a raw tenant value, typically an env var.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingTenant` if the tenant is absent or blank.
    pub fn from_tenant(value: Option<&str>) -> Result<Self, ConfigError> {
        let tenant = TenantId::parse(value.unwrap_or_default())?;
        Ok(Self::new(tenant))
    }

    #[must_use]
    pub fn with_pages(mut self, pages: PageNames) -> Self {
        self.pages = pages;
        self
    }

    #[must_use]
    pub fn with_recovery_reload_delay(mut self, delay: Duration) -> Self {
        self.recovery_reload_delay = delay;
        self
    }

    #[must_use]
    pub fn with_min_password_chars(mut self, chars: usize) -> Self {
        self.min_password_chars = chars.max(1);
        self
    }

    #[must_use]
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    #[must_use]
    pub fn pages(&self) -> &PageNames {
        &self.pages
    }

    #[must_use]
    pub fn recovery_reload_delay(&self) -> Duration {
        self.recovery_reload_delay
    }

    #[must_use]
    pub fn min_password_chars(&self) -> usize {
        self.min_password_chars
    }
}

#[derive(Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub api_key: SecretString,
    pub profile_table: String,
    pub tenant_column: String,
    pub session_file: Option<PathBuf>,
}

impl BackendConfig {
    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if the base URL does not parse or is not http(s).
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ConfigError::InvalidUrl(format!("{base_url}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{base_url}: unsupported scheme {}",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            api_key,
            profile_table: "profiles".to_string(),
            tenant_column: "tenant_id".to_string(),
            session_file: None,
        })
    }

    #[must_use]
    pub fn with_profile_table(mut self, table: &str) -> Self {
        if let Some(table) = normalize_value(table) {
            self.profile_table = table;
        }
        self
    }

    #[must_use]
    pub fn with_tenant_column(mut self, column: &str) -> Self {
        if let Some(column) = normalize_value(column) {
            self.tenant_column = column;
        }
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: Option<PathBuf>) -> Self {
        self.session_file = path;
        self
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"***")
            .field("profile_table", &self.profile_table)
            .field("tenant_column", &self.tenant_column)
            .field("session_file", &self.session_file)
            .finish()
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
