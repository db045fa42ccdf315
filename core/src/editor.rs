//! Create/edit form for a single todo.
//!
//! The editor is in update mode exactly when it was opened with an existing
//! item. Validation runs locally; an invalid form never produces a request.
//!
//! The priority is held as the raw stored value. An item whose priority the
//! select cannot show is displayed as Medium but saved back unchanged
//! unless the user picks another level.

use std::fmt;

use thiserror::Error;
use tracing::error;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::Outcome;
use crate::types::{Priority, Todo, TodoCreate, TodoUpdate};

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MIN_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Description,
    Priority,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Title, FormField::Description, FormField::Priority];
}

/// A single failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { required: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "Este campo es requerido"),
            FieldError::MinLength { required } => write!(f, "Mínimo {required} caracteres"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<(FormField, FieldError)>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Saved,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Touched {
    title: bool,
    description: bool,
    priority: bool,
}

#[derive(Debug, Clone)]
pub struct TodoEditor {
    client: TodoClient,
    original: Option<Todo>,
    title: String,
    description: String,
    priority: Option<i32>,
    is_completed: bool,
    touched: Touched,
    loading: bool,
    error: Option<String>,
}

impl TodoEditor {
    /// A blank editor in create mode.
    pub fn create(client: TodoClient) -> Self {
        Self::open(client, None)
    }

    /// An editor pre-filled from `todo`, in update mode.
    pub fn edit(client: TodoClient, todo: Todo) -> Self {
        Self::open(client, Some(todo))
    }

    fn open(client: TodoClient, original: Option<Todo>) -> Self {
        let (title, description, priority, is_completed) = match &original {
            Some(todo) => (
                todo.title.clone(),
                todo.description.clone(),
                todo.priority,
                todo.is_completed,
            ),
            None => (String::new(), String::new(), Priority::default().value(), false),
        };
        Self {
            client,
            original,
            title,
            description,
            priority: Some(priority),
            is_completed,
            touched: Touched::default(),
            loading: false,
            error: None,
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<&Todo> {
        self.original.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw value that will be submitted.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Level the priority select shows.
    pub fn display_priority(&self) -> Option<Priority> {
        self.priority.map(Priority::from_raw)
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submission failure shown above the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
        self.touched.title = true;
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
        self.touched.description = true;
    }

    pub fn set_priority(&mut self, value: Option<Priority>) {
        self.priority = value.map(Priority::value);
        self.touched.priority = true;
    }

    /// Only meaningful in update mode; create requests never carry it.
    pub fn set_completed(&mut self, value: bool) {
        self.is_completed = value;
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        match field {
            FormField::Title => self.touched.title,
            FormField::Description => self.touched.description,
            FormField::Priority => self.touched.priority,
        }
    }

    pub fn field_error(&self, field: FormField) -> Option<FieldError> {
        match field {
            FormField::Title => text_error(&self.title, TITLE_MIN_CHARS),
            FormField::Description => text_error(&self.description, DESCRIPTION_MIN_CHARS),
            FormField::Priority => self.priority.is_none().then_some(FieldError::Required),
        }
    }

    /// Message to display under `field`, once the user has touched it.
    pub fn error_message(&self, field: FormField) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.field_error(field).map(|e| e.to_string())
    }

    pub fn is_valid(&self) -> bool {
        FormField::ALL.iter().all(|f| self.field_error(*f).is_none())
    }

    /// Validate and build the create or replace request.
    ///
    /// An invalid form marks every field touched and returns
    /// [`EditorError::Invalid`] without building anything.
    pub fn submit(&mut self) -> Result<HttpRequest, EditorError> {
        let errors: Vec<(FormField, FieldError)> = FormField::ALL
            .iter()
            .filter_map(|f| self.field_error(*f).map(|e| (*f, e)))
            .collect();
        if !errors.is_empty() {
            self.touched = Touched {
                title: true,
                description: true,
                priority: true,
            };
            return Err(EditorError::Invalid(errors));
        }

        let priority = self.priority.unwrap_or_else(|| Priority::default().value());
        let request = match &self.original {
            Some(todo) => {
                let update = TodoUpdate {
                    id: todo.id,
                    title: self.title.clone(),
                    description: self.description.clone(),
                    is_completed: self.is_completed,
                    priority,
                    due_at: None,
                };
                self.client.build_update_todo(todo.id, &update)
            }
            None => {
                let create = TodoCreate {
                    title: self.title.clone(),
                    description: self.description.clone(),
                    priority,
                    due_at: None,
                };
                self.client.build_create_todo(&create)
            }
        };
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(self.failure_text().to_string());
                return Err(err.into());
            }
        };

        self.loading = true;
        self.error = None;
        Ok(request)
    }

    pub fn finish_submit(&mut self, outcome: Outcome) -> Option<EditorEvent> {
        let result = match &self.original {
            Some(_) => outcome
                .and_then(|response| self.client.parse_update_todo(response))
                .map(|_| ()),
            None => outcome
                .and_then(|response| self.client.parse_create_todo(response))
                .map(|_| ()),
        };
        self.loading = false;
        match result {
            Ok(()) => Some(EditorEvent::Saved),
            Err(err) => {
                error!("{}: {err}", self.failure_text());
                self.error = Some(self.failure_text().to_string());
                None
            }
        }
    }

    pub fn cancel(&self) -> EditorEvent {
        EditorEvent::Cancelled
    }

    fn failure_text(&self) -> &'static str {
        if self.is_edit_mode() {
            "Error al actualizar el TODO"
        } else {
            "Error al crear el TODO"
        }
    }
}

fn text_error(value: &str, min_chars: usize) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    (value.chars().count() < min_chars).then_some(FieldError::MinLength {
        required: min_chars,
    })
}
