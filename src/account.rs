//! Account actions available from every page: logout and the forgot-password
//! e-mail. Both report through the [`Ui`] and never return errors.

use crate::{
    backend::AuthBackend,
    config::PageNames,
    routing::{Location, Navigation},
    ui::{StatusMessage, Ui},
};
use tracing::{debug, error, info, instrument};

pub const LOGOUT_PROMPT: &str = "Are you sure you want to sign out?";

/// Signs out after confirmation and sends the user to the login page.
///
/// Returns the navigation that was issued, or `None` if the user declined.
/// A failed sign-out is reported but does not block the redirect.
#[instrument(skip_all)]
pub async fn logout<B, U>(
    backend: &B,
    ui: &U,
    location: &Location,
    pages: &PageNames,
) -> Option<Navigation>
where
    B: AuthBackend + ?Sized,
    U: Ui + ?Sized,
{
    if !ui.confirm(LOGOUT_PROMPT) {
        debug!("Logout cancelled");
        return None;
    }

    ui.show_loading(true);
    let result = backend.sign_out().await;
    ui.show_loading(false);

    match result {
        Ok(()) => info!("Signed out"),
        Err(err) => {
            error!("Sign-out failed: {err}");
            ui.show_status(&StatusMessage::error(format!(
                "Logout failed: {}",
                err.user_message()
            )));
        }
    }

    let navigation = Navigation::replace(location.resolve(&pages.login.href));
    ui.navigate(&navigation);
    Some(navigation)
}

/// Asks the backend to e-mail a reset link that lands back on this page.
#[instrument(level = "debug", skip(backend, ui, location))]
pub async fn request_password_reset<B, U>(backend: &B, ui: &U, identifier: &str, location: &Location)
where
    B: AuthBackend + ?Sized,
    U: Ui + ?Sized,
{
    let identifier = identifier.trim();
    if identifier.is_empty() {
        ui.show_status(&StatusMessage::error(
            "Enter your email address first to reset the password.",
        ));
        return;
    }

    if !ui.confirm(&format!("Send a password reset link to {identifier}?")) {
        debug!("Password reset cancelled");
        return;
    }

    ui.show_loading(true);
    let result = backend
        .send_password_reset_email(identifier, &location.without_fragment())
        .await;
    ui.show_loading(false);

    match result {
        Ok(()) => {
            info!("Password reset e-mail requested");
            ui.show_status(&StatusMessage::success(
                "Password reset link sent. Check your email inbox.",
            ));
        }
        Err(err) => {
            error!("Password reset request failed: {err}");
            ui.show_status(&StatusMessage::error(format!(
                "Failed to send reset link: {}",
                err.user_message()
            )));
        }
    }
}
