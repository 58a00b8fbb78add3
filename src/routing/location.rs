//! The page the controller is running on. Recovery links arrive as a URL
//! fragment (`#access_token=...&type=recovery`), so the fragment is kept.

use crate::errors::ConfigError;
use url::{Url, form_urlencoded};

/// Base used to resolve bare paths such as `/login.html`.
const RELATIVE_BASE: &str = "http://localhost/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parses an absolute URL or a bare path.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if the value cannot be parsed.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let url = match Url::parse(value) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(value))
                .map_err(|err| ConfigError::InvalidUrl(format!("{value}: {err}")))?,
            Err(err) => return Err(ConfigError::InvalidUrl(format!("{value}: {err}"))),
        };
        Ok(Self { url })
    }

    #[must_use]
    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// True when the fragment carries the recovery marker.
    #[must_use]
    pub fn is_recovery(&self) -> bool {
        self.url.fragment().is_some_and(|fragment| {
            form_urlencoded::parse(fragment.as_bytes())
                .any(|(key, value)| key == "type" && value == "recovery")
        })
    }

    /// The page URL without its fragment; used as the reset e-mail target and
    /// as the reload target once recovery completes.
    #[must_use]
    pub fn without_fragment(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    /// Resolves a page href against this location.
    #[must_use]
    pub fn resolve(&self, href: &str) -> String {
        self.url
            .join(href)
            .map_or_else(|_| href.to_string(), |url| url.to_string())
    }
}
