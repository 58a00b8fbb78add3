//! Presentation seam. The controller drives a [`Ui`] the way the page script
//! drove the DOM: a loading indicator, status messages, which form is
//! visible, confirmation prompts and navigation. Decision logic never touches
//! it directly.

pub mod console;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::console::ConsoleUi;

use crate::{recovery::ViewState, routing::Navigation};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub trait Ui: Send + Sync {
    fn show_loading(&self, loading: bool);
    fn show_status(&self, message: &StatusMessage);
    /// Shows exactly one of the login and reset forms.
    fn render(&self, view: ViewState);
    fn welcome(&self, identifier: &str);
    /// Blocking yes/no prompt. `false` cancels the action.
    fn confirm(&self, prompt: &str) -> bool;
    fn navigate(&self, navigation: &Navigation);
    /// Replaces all other output; used when the site configuration is unusable.
    fn render_fatal(&self, message: &str);
}
