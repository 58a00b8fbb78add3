//! Recording `Ui` for unit tests.

use super::{StatusKind, StatusMessage, Ui};
use crate::{recovery::ViewState, routing::Navigation};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Loading(bool),
    Status(StatusMessage),
    Render(ViewState),
    Welcome(String),
    Confirm(String),
    Navigate(Navigation),
    Fatal(String),
}

pub struct RecordingUi {
    answer: bool,
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    /// Ui whose confirmation prompts return `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<UiEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn statuses(&self) -> Vec<StatusMessage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Status(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<StatusMessage> {
        self.statuses().pop()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Navigate(navigation) => Some(navigation),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Confirm(prompt) => Some(prompt),
                _ => None,
            })
            .collect()
    }

    /// Loading indicator toggles must pair up and end switched off.
    pub fn loading_balanced(&self) -> bool {
        let mut on = false;
        for event in self.events() {
            if let UiEvent::Loading(loading) = event {
                if loading == on {
                    return false;
                }
                on = loading;
            }
        }
        !on
    }

    pub fn has_error(&self) -> bool {
        self.statuses()
            .iter()
            .any(|message| message.kind == StatusKind::Error)
    }

    fn push(&self, event: UiEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl Ui for RecordingUi {
    fn show_loading(&self, loading: bool) {
        self.push(UiEvent::Loading(loading));
    }

    fn show_status(&self, message: &StatusMessage) {
        self.push(UiEvent::Status(message.clone()));
    }

    fn render(&self, view: ViewState) {
        self.push(UiEvent::Render(view));
    }

    fn welcome(&self, identifier: &str) {
        self.push(UiEvent::Welcome(identifier.to_string()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.push(UiEvent::Confirm(prompt.to_string()));
        self.answer
    }

    fn navigate(&self, navigation: &Navigation) {
        self.push(UiEvent::Navigate(navigation.clone()));
    }

    fn render_fatal(&self, message: &str) {
        self.push(UiEvent::Fatal(message.to_string()));
    }
}
