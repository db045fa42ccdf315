//! Blocking driver that runs the list's begin/finish pairs over a
//! [`Transport`].
//!
//! Each method performs one user action to completion: build the request,
//! execute it, feed the outcome back, and run any follow-up the children
//! asked for (a silent reload after a mutation, the editor opening on
//! `Edit`). UIs with their own event loop can skip this and drive
//! [`TodoList`] directly.

use config::ConfigError;

use crate::card::CardEvent;
use crate::client::TodoClient;
use crate::editor::EditorError;
use crate::http::HttpRequest;
use crate::list::TodoList;
use crate::settings::Settings;
use crate::transport::{Transport, UreqTransport};

pub struct Session<T> {
    list: TodoList,
    transport: T,
}

impl Session<UreqTransport> {
    /// Connect to the service named in [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.api.base_url, UreqTransport::new())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_settings(&Settings::new()?))
    }
}

impl<T: Transport> Session<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            list: TodoList::new(TodoClient::new(base_url)),
            transport,
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    /// For control changes that need no I/O: filters, paging, form fields.
    pub fn list_mut(&mut self) -> &mut TodoList {
        &mut self.list
    }

    pub fn load(&mut self) {
        let request = self.list.begin_load();
        let outcome = self.transport.execute(&request);
        self.list.finish_load(outcome);
    }

    pub fn reload(&mut self) {
        let request = self.list.begin_reload();
        let outcome = self.transport.execute(&request);
        self.list.finish_reload(outcome);
    }

    /// Returns `false` when no card with `id` is on the visible page.
    pub fn toggle(&mut self, id: i64) -> bool {
        let Some(card) = self.list.card_mut(id) else {
            return false;
        };
        let Ok(request) = card.begin_toggle() else {
            return false;
        };
        let outcome = self.transport.execute(&request);
        let event = self.list.card_mut(id).and_then(|card| card.finish_toggle(outcome));
        self.dispatch_card_event(event);
        true
    }

    pub fn request_delete(&mut self, id: i64) -> bool {
        self.list.card_mut(id).map(|card| card.request_delete()).is_some()
    }

    pub fn cancel_delete(&mut self, id: i64) -> bool {
        self.list.card_mut(id).map(|card| card.cancel_delete()).is_some()
    }

    /// Returns `false` without sending anything unless the card's delete
    /// was armed by [`request_delete`](Session::request_delete).
    pub fn confirm_delete(&mut self, id: i64) -> bool {
        let Some(request) = self.list.card_mut(id).and_then(|card| card.confirm_delete()) else {
            return false;
        };
        let outcome = self.transport.execute(&request);
        let event = self.list.card_mut(id).and_then(|card| card.finish_delete(outcome));
        self.dispatch_card_event(event);
        true
    }

    pub fn edit(&mut self, id: i64) -> bool {
        let Some(event) = self.list.card(id).map(|card| card.edit()) else {
            return false;
        };
        self.dispatch_card_event(Some(event));
        true
    }

    pub fn open_create_form(&mut self) {
        self.list.open_create_form();
    }

    /// Submit the open editor. Validation failures come back as
    /// [`EditorError::Invalid`]; server failures stay on the editor as its
    /// error text and the panel remains open.
    pub fn submit_editor(&mut self) -> Result<(), EditorError> {
        let Some(editor) = self.list.editor_mut() else {
            return Ok(());
        };
        let request = editor.submit()?;
        let outcome = self.transport.execute(&request);
        let event = self.list.editor_mut().and_then(|editor| editor.finish_submit(outcome));
        if let Some(event) = event {
            let reload = self.list.handle_editor_event(event);
            self.follow_up(reload);
        }
        Ok(())
    }

    pub fn cancel_editor(&mut self) {
        if let Some(event) = self.list.editor().map(|editor| editor.cancel()) {
            let reload = self.list.handle_editor_event(event);
            self.follow_up(reload);
        }
    }

    fn dispatch_card_event(&mut self, event: Option<CardEvent>) {
        if let Some(event) = event {
            let request = self.list.handle_card_event(event);
            self.follow_up(request);
        }
    }

    fn follow_up(&mut self, reload: Option<HttpRequest>) {
        if let Some(request) = reload {
            let outcome = self.transport.execute(&request);
            self.list.finish_reload(outcome);
        }
    }
}
