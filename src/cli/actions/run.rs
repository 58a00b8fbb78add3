use crate::cli::actions::{Action, forgot_password, login, logout, recover, route};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::Route(args) => route::execute(args).await,
        Action::Logout(args) => logout::execute(args).await,
        Action::ForgotPassword(args) => forgot_password::execute(args).await,
        Action::Recover(args) => recover::execute(args).await,
    }
}
