//! Terminal rendering of the login page. Status lines, form changes and
//! navigation go to the configured writer (stderr by default) so stdout stays
//! free for command output; prompts use `dialoguer` on the controlling terminal.

use super::{StatusKind, StatusMessage, Ui};
use crate::{recovery::ViewState, routing::Navigation};
use colored::Colorize;
use dialoguer::{Confirm, Password};
use secrecy::SecretString;
use std::{
    io::{self, Write},
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, error};

pub struct ConsoleUi<W: Write + Send = io::Stderr> {
    out: Mutex<W>,
    assume_yes: bool,
    fatal: AtomicBool,
}

impl ConsoleUi<io::Stderr> {
    #[must_use]
    pub fn stderr(assume_yes: bool) -> Self {
        Self::new(io::stderr(), assume_yes)
    }
}

impl<W: Write + Send> ConsoleUi<W> {
    #[must_use]
    pub fn new(out: W, assume_yes: bool) -> Self {
        Self {
            out: Mutex::new(out),
            assume_yes,
            fatal: AtomicBool::new(false),
        }
    }

    /// Prompts for a password without echo. `None` when no terminal is available.
    #[must_use]
    pub fn read_secret(&self, prompt: &str) -> Option<SecretString> {
        match Password::new().with_prompt(prompt).interact() {
            Ok(value) => Some(SecretString::from(value)),
            Err(err) => {
                error!("Failed to read password: {err}");
                None
            }
        }
    }

    /// Returns the writer, mainly for inspecting output.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, text: &str) {
        // Nothing else is shown once a fatal error has been rendered.
        if self.fatal.load(Ordering::Acquire) {
            return;
        }
        self.write_line(text);
    }

    fn write_line(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(out, "{text}") {
            debug!("Failed to write output: {err}");
        }
    }
}

impl<W: Write + Send> Ui for ConsoleUi<W> {
    fn show_loading(&self, loading: bool) {
        if loading {
            self.line(&"…".dimmed().to_string());
        }
    }

    fn show_status(&self, message: &StatusMessage) {
        let text = match message.kind {
            StatusKind::Info => message.text.normal(),
            StatusKind::Success => message.text.green(),
            StatusKind::Error => message.text.red(),
        };
        self.line(&text.to_string());
    }

    fn render(&self, view: ViewState) {
        let label = match view {
            ViewState::LoginForm => "[login form]",
            ViewState::ResetForm => "[password reset form]",
        };
        self.line(&label.bold().to_string());
    }

    fn welcome(&self, identifier: &str) {
        self.line(&format!("Welcome, {identifier}"));
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(err) => {
                error!("Confirmation prompt failed: {err}");
                false
            }
        }
    }

    fn navigate(&self, navigation: &Navigation) {
        self.line(&navigation.to_string());
    }

    fn render_fatal(&self, message: &str) {
        self.fatal.store(true, Ordering::Release);
        self.write_line(&message.red().bold().to_string());
    }
}
