//! The list screen: loaded collection, derived view, visible cards and the
//! shared editor panel.
//!
//! # Design
//! `TodoList` is an owned value; nothing here is global. Like the client,
//! it never performs I/O. Each server interaction is a `begin_*` call that
//! hands back the request to execute and a `finish_*` call that takes the
//! outcome. Requests are independent and never deduplicated, so when two
//! loads overlap the one finished last decides the collection.
//!
//! Children report through [`CardEvent`] and [`EditorEvent`]; passing
//! them to `handle_*_event` returns the follow-up silent reload, if any.

use std::ops::RangeInclusive;

use tracing::{error, warn};

use crate::card::{CardEvent, TodoCard};
use crate::client::TodoClient;
use crate::editor::{EditorEvent, TodoEditor};
use crate::http::HttpRequest;
use crate::transport::Outcome;
use crate::types::Todo;
use crate::view::{self, ListFilters, PriorityFilter, SortKey, StatusFilter};

pub const LOAD_FAILED: &str = "Error al cargar los TODOs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// Nothing requested yet.
    Idle,
    /// Initial (spinner) load in flight.
    Loading,
    Loaded,
    /// A silent reload is in flight; the current view stays on screen.
    Reloading,
    /// The last spinner load failed; see [`TodoList::error`].
    Failed,
}

#[derive(Debug, Clone)]
pub struct TodoList {
    client: TodoClient,
    todos: Vec<Todo>,
    filters: ListFilters,
    view: Vec<Todo>,
    current_page: usize,
    total_pages: usize,
    cards: Vec<TodoCard>,
    loading: bool,
    loaded: bool,
    reloads_in_flight: usize,
    error: Option<String>,
    editor: Option<TodoEditor>,
}

impl TodoList {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            filters: ListFilters::default(),
            view: Vec::new(),
            current_page: 1,
            total_pages: 0,
            cards: Vec::new(),
            loading: false,
            loaded: false,
            reloads_in_flight: 0,
            error: None,
            editor: None,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn phase(&self) -> ListPhase {
        if self.loading {
            ListPhase::Loading
        } else if self.error.is_some() {
            ListPhase::Failed
        } else if self.reloads_in_flight > 0 {
            ListPhase::Reloading
        } else if self.loaded {
            ListPhase::Loaded
        } else {
            ListPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Everything the server returned on the last successful load.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Filtered and sorted, across all pages.
    pub fn filtered(&self) -> &[Todo] {
        &self.view
    }

    pub fn filters(&self) -> &ListFilters {
        &self.filters
    }

    // --- loading ---

    pub fn begin_load(&mut self) -> HttpRequest {
        self.loading = true;
        self.error = None;
        self.client.build_list_todos()
    }

    pub fn finish_load(&mut self, outcome: Outcome) {
        match outcome.and_then(|response| self.client.parse_list_todos(response)) {
            Ok(todos) => self.replace_collection(todos),
            Err(err) => {
                error!("{LOAD_FAILED}: {err}");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    /// Refetch without the spinner. Used after every successful mutation.
    pub fn begin_reload(&mut self) -> HttpRequest {
        self.error = None;
        self.reloads_in_flight += 1;
        self.client.build_list_todos()
    }

    /// A failed silent reload is only logged; the current view stays.
    pub fn finish_reload(&mut self, outcome: Outcome) {
        self.reloads_in_flight = self.reloads_in_flight.saturating_sub(1);
        match outcome.and_then(|response| self.client.parse_list_todos(response)) {
            Ok(todos) => self.replace_collection(todos),
            Err(err) => warn!("Error al recargar: {err}"),
        }
    }

    fn replace_collection(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.loaded = true;
        self.apply_filters();
    }

    // --- controls ---

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search = term.into();
        self.apply_filters();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filters.status = status;
        self.apply_filters();
    }

    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.filters.priority = priority;
        self.apply_filters();
    }

    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.filters.sort = sort;
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.view = view::derive_view(&self.todos, &self.filters);
        self.total_pages = view::page_count(self.view.len());
        self.current_page = 1;
        self.rebuild_cards();
    }

    // --- pagination ---

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// Pages outside `1..=total_pages` are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        if (1..=self.total_pages).contains(&page) {
            self.current_page = page;
            self.rebuild_cards();
        }
    }

    pub fn visible(&self) -> &[Todo] {
        view::page_slice(&self.view, self.current_page)
    }

    fn rebuild_cards(&mut self) {
        self.cards = self
            .visible()
            .iter()
            .map(|todo| TodoCard::new(self.client.clone(), todo.clone()))
            .collect();
    }

    // --- children ---

    pub fn cards(&self) -> &[TodoCard] {
        &self.cards
    }

    pub fn card(&self, id: i64) -> Option<&TodoCard> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn card_mut(&mut self, id: i64) -> Option<&mut TodoCard> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    pub fn open_create_form(&mut self) {
        self.editor = Some(TodoEditor::create(self.client.clone()));
    }

    pub fn open_edit_form(&mut self, todo: Todo) {
        self.editor = Some(TodoEditor::edit(self.client.clone(), todo));
    }

    pub fn close_form(&mut self) {
        self.editor = None;
    }

    pub fn is_form_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editing(&self) -> Option<&Todo> {
        self.editor.as_ref().and_then(TodoEditor::original)
    }

    pub fn editor(&self) -> Option<&TodoEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut TodoEditor> {
        self.editor.as_mut()
    }

    pub fn handle_card_event(&mut self, event: CardEvent) -> Option<HttpRequest> {
        match event {
            CardEvent::Edit(todo) => {
                self.open_edit_form(todo);
                None
            }
            CardEvent::Toggled | CardEvent::Deleted => Some(self.begin_reload()),
        }
    }

    pub fn handle_editor_event(&mut self, event: EditorEvent) -> Option<HttpRequest> {
        self.close_form();
        match event {
            EditorEvent::Saved => Some(self.begin_reload()),
            EditorEvent::Cancelled => None,
        }
    }
}
