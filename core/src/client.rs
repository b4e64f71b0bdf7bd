//! Stateless HTTP request builder and response parser for the todo store.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each store primitive is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O dependencies.
//!
//! The store scopes reads by user: listing always carries a `userId` query
//! parameter. Deletion echoes the removed record's id in the response body,
//! and `parse_delete_todo` returns that echo rather than assuming it.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoPatch};

/// Synchronous, stateless client for the todo store.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, user_id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos?userId={user_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialize(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_patch_todo(&self, id: i64, patch: &TodoPatch) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(patch).map_err(|e| ApiError::Serialize(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/todos/{id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    pub fn parse_patch_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    /// Returns the id of the record the server actually removed.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<i64, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    #[test]
    fn build_list_todos_scopes_by_user() {
        let req = client().build_list_todos(7);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todos?userId=7");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = NewTodo {
            user_id: 7,
            title: "Buy milk".to_string(),
            completed: false,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["userId"], 7);
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
    }

    #[test]
    fn build_patch_todo_sends_only_present_fields() {
        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        let req = client().build_patch_todo(12, &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/todos/12");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["completed"], true);
        assert!(body.get("title").is_none());
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(12);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todos/12");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"[{"id":1,"userId":7,"title":"Test","completed":false}]"#.to_string(),
        };
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].user_id, 7);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_create_todo_success() {
        let response = HttpResponse {
            status: 201,
            headers: Vec::new(),
            body: r#"{"id":4,"userId":7,"title":"New","completed":false}"#.to_string(),
        };
        let todo = client().parse_create_todo(response).unwrap();
        assert_eq!(todo.id, 4);
        assert_eq!(todo.title, "New");
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_patch_todo_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"id":4,"userId":7,"title":"Updated","completed":true}"#.to_string(),
        };
        let todo = client().parse_patch_todo(response).unwrap();
        assert_eq!(todo.title, "Updated");
        assert!(todo.completed);
    }

    #[test]
    fn parse_patch_todo_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_patch_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_todo_returns_echoed_id() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "12".to_string(),
        };
        assert_eq!(client().parse_delete_todo(response).unwrap(), 12);
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_delete_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos(7);
        assert_eq!(req.path, "http://localhost:3000/todos?userId=7");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse_list_todos(response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }
}
