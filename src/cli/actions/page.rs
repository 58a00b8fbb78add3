//! Everything a subcommand needs to act on one page: the backend client, the
//! console and a controller wired to both.

use crate::{
    backend::http::HttpBackend,
    cli::globals::GlobalArgs,
    controller::Controller,
    routing::Location,
    ui::ConsoleUi,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

pub struct Page {
    pub backend: Arc<HttpBackend>,
    pub ui: Arc<ConsoleUi>,
    pub controller: Controller<HttpBackend, ConsoleUi>,
    pub location: Location,
}

impl Page {
    /// Opens `url`, or the configured page URL when `None`.
    ///
    /// # Errors
    /// Returns an error if a URL is invalid, the backend client cannot be
    /// built or the site configuration is incomplete.
    pub fn open(globals: &GlobalArgs, url: Option<&str>) -> Result<Self> {
        let ui = Arc::new(ConsoleUi::stderr(globals.assume_yes));

        let location = match url {
            Some(url) => Location::parse(url)?,
            None => globals.location()?,
        };
        debug!(path = location.path(), "Opening page");

        let backend = Arc::new(HttpBackend::new(globals.backend_config()?)?);
        let controller = Controller::try_new(backend.clone(), ui.clone(), globals.site_config())
            .context("site configuration is incomplete")?;

        Ok(Self {
            backend,
            ui,
            controller,
            location,
        })
    }
}
