//! In-memory stand-in for the todo REST service.
//!
//! # Design
//! Serves `/Todos` and `/Todos/{id}` with the same `{code, data, messages}`
//! envelope the real service uses. State lives in a single `Store` behind an
//! `RwLock`; ids are assigned sequentially from 1 and every write stamps
//! `updatedAt` with the current UTC time. Unknown ids answer with a 404
//! envelope and a replace whose body id differs from the path answers 400.
//! Intended for tests and local development only: nothing is persisted.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub priority: i32,
    pub due_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoCreate {
    pub title: String,
    pub description: String,
    pub priority: i32,
    #[serde(default)]
    pub due_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub priority: i32,
    #[serde(default)]
    pub due_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePatch {
    pub is_completed: bool,
}

/// The `{code, data, messages}` wrapper around every response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub data: T,
    pub messages: Vec<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/Todos", get(list_todos).post(create_todo))
        .route(
            "/Todos/{id}",
            get(get_todo)
                .put(update_todo)
                .patch(toggle_todo)
                .delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock todo api listening");
    }
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn ok<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = Envelope {
        code: status.as_u16(),
        data,
        messages: Vec::new(),
    };
    (status, Json(body)).into_response()
}

fn fail(status: StatusCode, message: String) -> Response {
    let body = Envelope {
        code: status.as_u16(),
        data: (),
        messages: vec![message],
    };
    (status, Json(body)).into_response()
}

fn not_found(id: i64) -> Response {
    fail(StatusCode::NOT_FOUND, format!("Todo {id} not found"))
}

async fn list_todos(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let todos: Vec<Todo> = store.todos.values().cloned().collect();
    ok(StatusCode::OK, todos)
}

async fn create_todo(State(db): State<Db>, Json(input): Json<TodoCreate>) -> Response {
    let mut store = db.write().await;
    store.next_id += 1;
    let stamp = now();
    let todo = Todo {
        id: store.next_id,
        title: input.title,
        description: input.description,
        is_completed: false,
        priority: input.priority,
        due_at: input.due_at,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    store.todos.insert(todo.id, todo.clone());
    info!(id = todo.id, "created todo");
    ok(StatusCode::CREATED, todo)
}

async fn get_todo(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.todos.get(&id) {
        Some(todo) => ok(StatusCode::OK, todo.clone()),
        None => not_found(id),
    }
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TodoUpdate>,
) -> Response {
    if input.id != id {
        return fail(
            StatusCode::BAD_REQUEST,
            format!("Body id {} does not match path id {id}", input.id),
        );
    }
    let mut store = db.write().await;
    let Some(todo) = store.todos.get_mut(&id) else {
        return not_found(id);
    };
    todo.title = input.title;
    todo.description = input.description;
    todo.is_completed = input.is_completed;
    todo.priority = input.priority;
    todo.due_at = input.due_at;
    todo.updated_at = now();
    ok(StatusCode::OK, todo.clone())
}

async fn toggle_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TogglePatch>,
) -> Response {
    let mut store = db.write().await;
    let Some(todo) = store.todos.get_mut(&id) else {
        return not_found(id);
    };
    todo.is_completed = input.is_completed;
    todo.updated_at = now();
    ok(StatusCode::OK, todo.clone())
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    match store.todos.remove(&id) {
        Some(_) => {
            info!(id, "deleted todo");
            ok(StatusCode::OK, ())
        }
        None => not_found(id),
    }
}
