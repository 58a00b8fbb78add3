pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod page;
pub mod recover;
pub mod route;

mod run;

use crate::routing::RouteAction;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Route(route::Args),
    Logout(logout::Args),
    ForgotPassword(forgot_password::Args),
    Recover(recover::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// One-line summary of a route action for stdout.
#[must_use]
pub fn describe(action: &RouteAction) -> String {
    match action {
        RouteAction::Redirect(navigation) => format!("redirect {}", navigation.href),
        RouteAction::ShowRecovery => "recovery".to_string(),
        RouteAction::Welcome {
            identifier: Some(identifier),
        } => format!("welcome {identifier}"),
        RouteAction::Welcome { identifier: None } => "welcome".to_string(),
        RouteAction::ShowLoginForm => "login-form".to_string(),
        RouteAction::Rejected(denial) => format!("rejected: {denial}"),
        RouteAction::Stay => "stay".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Denial, routing::Navigation};

    #[test]
    fn describes_route_actions() {
        assert_eq!(
            describe(&RouteAction::Redirect(Navigation::replace(
                "https://s.example/dashboard.html".to_string()
            ))),
            "redirect https://s.example/dashboard.html"
        );
        assert_eq!(
            describe(&RouteAction::Welcome {
                identifier: Some("a@x.com".to_string())
            }),
            "welcome a@x.com"
        );
        assert_eq!(
            describe(&RouteAction::Rejected(Denial::TenantMismatch)),
            "rejected: Your account is not registered for this site."
        );
    }
}
