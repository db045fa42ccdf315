//! Filter, sort and pagination transforms over the loaded collection.
//!
//! Everything here is a pure function of a todo slice and a
//! [`ListFilters`] value; the orchestrator in [`crate::list`] owns both and
//! calls [`derive_view`] whenever either changes.

use std::cmp::Ordering;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use thiserror::Error;
use tracing::warn;

use crate::types::{Priority, Todo};

/// Items shown per page. Not configurable.
pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Alphabetical by title.
    Title,
    /// Highest priority first.
    Priority,
    /// Newest first.
    #[default]
    Date,
}

/// A control value from the UI that does not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {control} option: {value:?}")]
pub struct ParseControlError {
    pub control: &'static str,
    pub value: String,
}

impl ParseControlError {
    fn new(control: &'static str, value: &str) -> Self {
        Self {
            control,
            value: value.to_string(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(ParseControlError::new("status", other)),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(PriorityFilter::All);
        }
        s.parse::<i32>()
            .ok()
            .and_then(Priority::try_from_raw)
            .map(PriorityFilter::Only)
            .ok_or_else(|| ParseControlError::new("priority", s))
    }
}

impl FromStr for SortKey {
    type Err = ParseControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "priority" => Ok(SortKey::Priority),
            "date" => Ok(SortKey::Date),
            other => Err(ParseControlError::new("sort", other)),
        }
    }
}

/// The user's current list controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
}

impl ListFilters {
    fn matches(&self, todo: &Todo, term: Option<&str>) -> bool {
        if let Some(term) = term {
            let hit = todo.title.to_lowercase().contains(term)
                || todo.description.to_lowercase().contains(term);
            if !hit {
                return false;
            }
        }
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => todo.is_completed,
            StatusFilter::Pending => !todo.is_completed,
        };
        let priority_ok = match self.priority {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => todo.priority == p.value(),
        };
        status_ok && priority_ok
    }
}

/// Filter then sort a copy of `todos`. The sort is stable.
pub fn derive_view(todos: &[Todo], filters: &ListFilters) -> Vec<Todo> {
    let term = (!filters.search.is_empty()).then(|| filters.search.to_lowercase());
    let mut view: Vec<Todo> = todos
        .iter()
        .filter(|todo| filters.matches(todo, term.as_deref()))
        .cloned()
        .collect();

    match filters.sort {
        SortKey::Title => {
            let order = TitleOrder::new();
            view.sort_by(|a, b| order.compare(&a.title, &b.title));
        }
        SortKey::Priority => view.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortKey::Date => view.sort_by(|a, b| b.created_timestamp().cmp(&a.created_timestamp())),
    }
    view
}

pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// The 1-based `page` of `view`. Empty when the page is past the end.
pub fn page_slice(view: &[Todo], page: usize) -> &[Todo] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(view.len());
    let end = start.saturating_add(PAGE_SIZE).min(view.len());
    &view[start..end]
}

/// Title ordering under the Unicode root collation.
///
/// Case and accents only break ties, expansions such as `Œ` compare as
/// their letters, and punctuation sorts before letters. When no collation
/// data can be loaded titles compare by code point.
pub struct TitleOrder {
    collator: Option<Collator>,
}

impl TitleOrder {
    pub fn new() -> Self {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| warn!("title collation unavailable: {e}"))
            .ok();
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl Default for TitleOrder {
    fn default() -> Self {
        Self::new()
    }
}
