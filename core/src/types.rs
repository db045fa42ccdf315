//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the remote service's JSON schema (camelCase field
//! names) but are defined independently from the mock-server crate.
//! Integration tests catch any schema drift between the two.
//!
//! Timestamps stay as the strings the server sent. They are only parsed
//! when something needs to order by them, so a value the client cannot
//! read is still echoed back untouched.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    /// Raw priority as stored by the server. See [`Priority::from_raw`].
    pub priority: i32,
    pub due_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Todo {
    /// Priority used for display; unknown values read as `Medium`.
    pub fn display_priority(&self) -> Priority {
        Priority::from_raw(self.priority)
    }

    /// Creation time, or `None` if the server sent something unreadable.
    pub fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoCreate {
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub due_at: Option<String>,
}

/// Full replacement payload for an existing todo. Every field is always
/// sent; the server overwrites all of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub priority: i32,
    pub due_at: Option<String>,
}

/// Partial body sent by the toggle operation. Only the completion flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TogglePatch {
    pub is_completed: bool,
}

/// Envelope wrapped around every payload the service returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Priority levels understood by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Strict conversion: `None` for anything outside 1..=3.
    pub fn try_from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }

    /// Lenient conversion used for display. Out-of-range values are shown
    /// as `Medium`; the stored integer itself is left alone.
    pub fn from_raw(raw: i32) -> Self {
        Self::try_from_raw(raw).unwrap_or_default()
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "BAJA",
            Priority::Medium => "MEDIA",
            Priority::High => "ALTA",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Parse a server timestamp. Accepts RFC 3339 with an offset, or a naive
/// ISO-8601 date-time which is taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
