use crate::cli::{actions::describe, actions::page::Page, globals::GlobalArgs};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub url: Option<String>,
}

/// Execute the route action.
/// # Errors
/// Returns an error if the page cannot be opened.
pub async fn execute(args: Args) -> Result<()> {
    let page = Page::open(&args.globals, args.url.as_deref())?;
    let action = page.controller.page_load(&page.location).await;
    println!("{}", describe(&action));
    Ok(())
}
