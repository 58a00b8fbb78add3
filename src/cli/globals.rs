use crate::{
    config::{BackendConfig, SiteConfig},
    errors::ConfigError,
    routing::Location,
};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// Settings shared by every subcommand.
#[derive(Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    pub api_key: SecretString,
    pub profile_table: String,
    pub tenant_column: String,
    pub session_file: Option<PathBuf>,
    pub tenant_id: Option<String>,
    pub page_url: String,
    pub reload_delay: Duration,
    pub assume_yes: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String, api_key: SecretString, page_url: String) -> Self {
        Self {
            backend_url,
            api_key,
            profile_table: "profiles".to_string(),
            tenant_column: "tenant_id".to_string(),
            session_file: None,
            tenant_id: None,
            page_url,
            reload_delay: crate::config::DEFAULT_RECOVERY_RELOAD_DELAY,
            assume_yes: false,
        }
    }

    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if the backend URL is unusable.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        Ok(BackendConfig::new(&self.backend_url, self.api_key.clone())?
            .with_profile_table(&self.profile_table)
            .with_tenant_column(&self.tenant_column)
            .with_session_file(self.session_file.clone()))
    }

    /// # Errors
    /// Returns `ConfigError::MissingTenant` if no tenant was configured.
    pub fn site_config(&self) -> Result<SiteConfig, ConfigError> {
        Ok(SiteConfig::from_tenant(self.tenant_id.as_deref())?
            .with_recovery_reload_delay(self.reload_delay))
    }

    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if the page URL does not parse.
    pub fn location(&self) -> Result<Location, ConfigError> {
        Location::parse(&self.page_url)
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("backend_url", &self.backend_url)
            .field("api_key", &"***")
            .field("profile_table", &self.profile_table)
            .field("tenant_column", &self.tenant_column)
            .field("session_file", &self.session_file)
            .field("tenant_id", &self.tenant_id)
            .field("page_url", &self.page_url)
            .field("reload_delay", &self.reload_delay)
            .field("assume_yes", &self.assume_yes)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn globals() -> GlobalArgs {
        GlobalArgs::new(
            "https://project.example.co".to_string(),
            SecretString::from("anon-key".to_string()),
            "https://school.example/login.html".to_string(),
        )
    }

    #[test]
    fn test_global_args() {
        let args = globals();
        assert_eq!(args.backend_url, "https://project.example.co");
        assert_eq!(args.api_key.expose_secret(), "anon-key");
        assert!(!format!("{args:?}").contains("anon-key"));
    }

    #[test]
    fn test_site_config_requires_tenant() {
        let mut args = globals();
        assert_eq!(args.site_config().err(), Some(ConfigError::MissingTenant));

        args.tenant_id = Some("school-1".to_string());
        args.reload_delay = Duration::from_secs(1);
        let site = args.site_config().unwrap();
        assert_eq!(site.tenant().as_str(), "school-1");
        assert_eq!(site.recovery_reload_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_backend_config() {
        let mut args = globals();
        args.profile_table = "pengguna".to_string();
        let config = args.backend_config().unwrap();
        assert_eq!(config.profile_table, "pengguna");
        assert_eq!(config.tenant_column, "tenant_id");

        args.backend_url = "ftp://project.example.co".to_string();
        assert!(args.backend_config().is_err());
    }
}
