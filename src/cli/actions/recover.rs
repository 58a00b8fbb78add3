use crate::{
    cli::{actions::page::Page, globals::GlobalArgs},
    recovery::ViewState,
};
use anyhow::{Context, Result, bail};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    /// Callback URL from the reset e-mail, fragment included.
    pub url: String,
}

/// Execute the recover action: ingest the callback, prompt for a new password
/// and wait for the reload.
/// # Errors
/// Returns an error if the link is invalid or the password update fails.
pub async fn execute(args: Args) -> Result<()> {
    let page = Page::open(&args.globals, Some(&args.url))?;

    let event = page
        .backend
        .ingest_redirect(page.location.url())
        .await
        .context("recovery link was rejected")?;
    let Some(event) = event else {
        bail!("the URL carries no session fragment");
    };
    page.controller.handle_session_event(&event);

    if page.controller.view() != ViewState::ResetForm {
        bail!("the URL is not a password recovery link");
    }

    let secret = page
        .ui
        .read_secret("New password")
        .context("a new password is required")?;
    let reload = page
        .controller
        .submit_new_password(&secret, &page.location)
        .await?;
    println!("redirect {}", reload.href);

    Ok(())
}
