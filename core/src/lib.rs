//! Client-side core of a todo list manager backed by a remote REST API.
//!
//! # Overview
//! The crate holds the presentation logic of the todo screen: the list with
//! its search, filters, sorting and pagination, one presenter per visible
//! item, and the create/edit form. None of it touches the network directly
//! (host-does-IO pattern). Components hand out `HttpRequest` values and
//! take back the outcome of the round trip, so they stay deterministic and
//! easy to test.
//!
//! # Design
//! - `TodoClient` is stateless and the only place that knows the wire
//!   format. It unwraps the `{code, data, messages}` envelope and turns
//!   every failure into an [`ApiError`] whose `Display` is user-facing.
//! - [`TodoList`], [`TodoCard`] and [`TodoEditor`] are owned state machines.
//!   Children report to the list through [`CardEvent`] and [`EditorEvent`].
//! - [`Transport`] executes requests; [`Session`] wires it to a list for
//!   hosts that are happy to block.

pub mod card;
pub mod client;
pub mod editor;
pub mod error;
pub mod http;
pub mod list;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;
pub mod view;

pub use card::{CardEvent, TodoCard};
pub use client::TodoClient;
pub use editor::{EditorError, EditorEvent, FieldError, FormField, TodoEditor};
pub use error::ApiError;
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{ListPhase, TodoList};
pub use session::Session;
pub use settings::Settings;
pub use transport::{Outcome, Transport, UreqTransport};
pub use types::{ApiResponse, Priority, Todo, TodoCreate, TodoUpdate, TogglePatch};
pub use view::{ListFilters, PriorityFilter, SortKey, StatusFilter, PAGE_SIZE};
