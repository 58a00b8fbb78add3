//! Session routing: which page the user should be looking at.
//!
//! The router never navigates by itself; it returns a [`RouteAction`] that the
//! controller hands to the UI. Redirects always replace history so the back
//! button cannot return to a page that no longer matches the session.

pub mod location;
pub mod page;
pub mod router;

pub use self::location::Location;
pub use self::page::PageClass;
pub use self::router::SessionRouter;

use crate::errors::Denial;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub href: String,
    pub replace: bool,
}

impl Navigation {
    /// A redirect that replaces the current history entry.
    #[must_use]
    pub fn replace(href: String) -> Self {
        Self {
            href,
            replace: true,
        }
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.replace {
            write!(f, "replace -> {}", self.href)
        } else {
            write!(f, "push -> {}", self.href)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteAction {
    Redirect(Navigation),
    /// Signed in through a recovery link: stay so the reset form can render.
    ShowRecovery,
    /// Signed in on a protected page.
    Welcome { identifier: Option<String> },
    /// Signed out on the login page.
    ShowLoginForm,
    /// The session on the login page failed the site-access check and was signed out.
    Rejected(Denial),
    /// Not a page the router manages.
    Stay,
}
