use crate::cli::{actions::page::Page, globals::GlobalArgs};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Execute the logout action.
/// # Errors
/// Returns an error if the page cannot be opened.
pub async fn execute(args: Args) -> Result<()> {
    let page = Page::open(&args.globals, None)?;
    if let Some(navigation) = page.controller.logout(&page.location).await {
        println!("redirect {}", navigation.href);
    }
    Ok(())
}
