use crate::cli::{actions::page::Page, globals::GlobalArgs};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
}

/// Execute the forgot-password action. The outcome is reported on the console.
/// # Errors
/// Returns an error if the page cannot be opened.
pub async fn execute(args: Args) -> Result<()> {
    let page = Page::open(&args.globals, None)?;
    page.controller
        .forgot_password(&args.email, &page.location)
        .await;
    Ok(())
}
