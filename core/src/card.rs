//! Presenter for a single todo on the visible page.
//!
//! A card is the todo it was built from plus two local flags: whether a
//! delete is waiting for confirmation, and whether one of its own requests
//! is in flight. It never touches the collection; results travel upward as
//! [`CardEvent`]s for the list to act on.

use tracing::error;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::Outcome;
use crate::types::{Priority, Todo};

/// Something the parent list needs to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    /// Open the editor for this item.
    Edit(Todo),
    /// The completion flag was changed on the server.
    Toggled,
    /// The item was removed on the server.
    Deleted,
}

#[derive(Debug, Clone)]
pub struct TodoCard {
    client: TodoClient,
    todo: Todo,
    confirming_delete: bool,
    loading: bool,
}

impl TodoCard {
    pub fn new(client: TodoClient, todo: Todo) -> Self {
        Self {
            client,
            todo,
            confirming_delete: false,
            loading: false,
        }
    }

    pub fn todo(&self) -> &Todo {
        &self.todo
    }

    pub fn id(&self) -> i64 {
        self.todo.id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn priority(&self) -> Priority {
        self.todo.display_priority()
    }

    pub fn priority_label(&self) -> &'static str {
        self.priority().label()
    }

    pub fn priority_class(&self) -> &'static str {
        self.priority().css_class()
    }

    pub fn edit(&self) -> CardEvent {
        CardEvent::Edit(self.todo.clone())
    }

    /// Request the inverse of the completion flag this card was built with.
    pub fn begin_toggle(&mut self) -> Result<HttpRequest, ApiError> {
        let request = self
            .client
            .build_toggle_todo(self.todo.id, !self.todo.is_completed)?;
        self.loading = true;
        Ok(request)
    }

    pub fn finish_toggle(&mut self, outcome: Outcome) -> Option<CardEvent> {
        let result = outcome.and_then(|response| self.client.parse_toggle_todo(response));
        self.loading = false;
        match result {
            Ok(_) => Some(CardEvent::Toggled),
            Err(err) => {
                error!(id = self.todo.id, "Error al cambiar estado: {err}");
                None
            }
        }
    }

    /// First step of a delete: only arms the confirmation.
    pub fn request_delete(&mut self) {
        self.confirming_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Issue the delete. Does nothing unless [`request_delete`] armed it.
    ///
    /// [`request_delete`]: TodoCard::request_delete
    pub fn confirm_delete(&mut self) -> Option<HttpRequest> {
        if !self.confirming_delete {
            return None;
        }
        self.loading = true;
        Some(self.client.build_delete_todo(self.todo.id))
    }

    pub fn finish_delete(&mut self, outcome: Outcome) -> Option<CardEvent> {
        let result = outcome.and_then(|response| self.client.parse_delete_todo(response));
        self.loading = false;
        self.confirming_delete = false;
        match result {
            Ok(()) => Some(CardEvent::Deleted),
            Err(err) => {
                error!(id = self.todo.id, "Error al eliminar: {err}");
                None
            }
        }
    }
}
