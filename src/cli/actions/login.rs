use crate::{
    auth::Credentials,
    cli::{actions::describe, actions::page::Page, globals::GlobalArgs},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: Option<SecretString>,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the login is denied or the page cannot be opened.
pub async fn execute(args: Args) -> Result<()> {
    let page = Page::open(&args.globals, None)?;

    let password = match args.password {
        Some(password) => password,
        None => page
            .ui
            .read_secret("Password")
            .context("a password is required")?,
    };
    let credentials = Credentials::new(&args.email, password.expose_secret());

    let action = page
        .controller
        .submit_login(&credentials, &page.location)
        .await?;
    println!("{}", describe(&action));

    Ok(())
}
