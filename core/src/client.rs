//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the resource URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Envelope unwrapping happens here and nowhere else:
//! `parse_*` returns either the payload or a normalized [`ApiError`].
//!
//! Update is always a full replacement (`PUT` with every field) while
//! toggle sends only the completion flag (`PATCH`). The two shapes are
//! distinct on the wire and must stay that way.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, Todo, TodoCreate, TodoUpdate, TogglePatch};

const RESOURCE: &str = "Todos";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoClient {
    resource_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            resource_url: format!("{}/{RESOURCE}", base_url.trim_end_matches('/')),
        }
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.resource_url.clone(), None)
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id), None)
    }

    pub fn build_create_todo(&self, input: &TodoCreate) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Post, self.resource_url.clone(), Some(body)))
    }

    pub fn build_update_todo(&self, id: i64, input: &TodoUpdate) -> Result<HttpRequest, ApiError> {
        let body = encode(input)?;
        Ok(self.request(HttpMethod::Put, self.item_url(id), Some(body)))
    }

    pub fn build_toggle_todo(&self, id: i64, is_completed: bool) -> Result<HttpRequest, ApiError> {
        let body = encode(&TogglePatch { is_completed })?;
        Ok(self.request(HttpMethod::Patch, self.item_url(id), Some(body)))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        unwrap_envelope(response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        unwrap_envelope(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        unwrap_envelope(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        unwrap_envelope(response)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        unwrap_envelope(response)
    }

    /// The delete payload is `void`, so the body is not inspected on success.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response).map_err(log_failure)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.resource_url)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        debug!(method = method.as_str(), %path, "building request");
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }
}

fn encode<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input)
        .map_err(|e| ApiError::Encode(e.to_string()))
        .map_err(log_failure)
}

fn unwrap_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response).map_err(log_failure)?;
    serde_json::from_str::<ApiResponse<T>>(&response.body)
        .map(|envelope| envelope.data)
        .map_err(|e| ApiError::Server {
            status: response.status,
            message: format!("Http failure during parsing: {e}"),
        })
        .map_err(log_failure)
}

/// Map a non-2xx response to `ApiError::Server`, preferring the messages
/// the service put in its envelope over the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Server {
        status: response.status,
        message: server_message(response),
    })
}

fn server_message(response: &HttpResponse) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&response.body) {
        if !envelope.messages.is_empty() {
            return envelope.messages.join("; ");
        }
    }
    let body = response.body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    ::http::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}

fn log_failure(err: ApiError) -> ApiError {
    error!("{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const TODO_JSON: &str = r#"{"id":1,"title":"Test","description":"A test todo","isCompleted":false,"priority":2,"dueAt":null,"createdAt":"2025-03-01T10:00:00Z","updatedAt":"2025-03-01T10:00:00Z"}"#;

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/Todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/Todos/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = TodoCreate {
            title: "Buy milk".to_string(),
            description: "2% milk, 1 gallon".to_string(),
            priority: 2,
            due_at: None,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/Todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["priority"], 2);
        assert!(body["dueAt"].is_null());
    }

    #[test]
    fn build_update_todo_sends_every_field() {
        let input = TodoUpdate {
            id: 5,
            title: "Updated".to_string(),
            description: "Updated description".to_string(),
            is_completed: true,
            priority: 3,
            due_at: None,
        };
        let req = client().build_update_todo(5, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/Todos/5");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        let fields: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(body["id"], 5);
        assert_eq!(body["isCompleted"], true);
    }

    #[test]
    fn build_toggle_todo_sends_only_the_flag() {
        let req = client().build_toggle_todo(5, true).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/Todos/5");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "isCompleted": true }));
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(5);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/Todos/5");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_unwraps_envelope() {
        let body = format!(r#"{{"code":200,"data":[{TODO_JSON}],"messages":["ok"]}}"#);
        let todos = client().parse_list_todos(response(200, &body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_create_todo_accepts_any_2xx() {
        let body = format!(r#"{{"code":201,"data":{TODO_JSON},"messages":[]}}"#);
        let todo = client().parse_create_todo(response(201, &body)).unwrap();
        assert_eq!(todo.id, 1);
    }

    #[test]
    fn parse_get_todo_not_found_uses_envelope_messages() {
        let body = r#"{"code":404,"data":null,"messages":["Todo 9 not found"]}"#;
        let err = client().parse_get_todo(response(404, body)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Código: 404\nMensaje: Todo 9 not found");
    }

    #[test]
    fn server_error_falls_back_to_body_then_reason() {
        let err = client().parse_toggle_todo(response(500, "boom")).unwrap_err();
        assert_eq!(err.to_string(), "Código: 500\nMensaje: boom");

        let err = client().parse_delete_todo(response(503, "")).unwrap_err();
        assert_eq!(err.to_string(), "Código: 503\nMensaje: Service Unavailable");
    }

    #[test]
    fn parse_delete_todo_ignores_void_payload() {
        let ok = response(200, r#"{"code":200,"data":null,"messages":[]}"#);
        assert!(client().parse_delete_todo(ok).is_ok());
        assert!(client().parse_delete_todo(response(204, "")).is_ok());
    }

    #[test]
    fn bad_json_on_success_is_a_parsing_failure() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 200);
                assert!(message.starts_with("Http failure during parsing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_todos().path, "http://localhost:3000/Todos");
    }
}
