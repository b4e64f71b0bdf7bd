use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub user_id: Option<i64>,
}

#[derive(Debug, Default)]
pub struct Store {
    todos: HashMap<i64, Todo>,
    next_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let mut todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|todo| params.user_id.map_or(true, |user| todo.user_id == user))
        .cloned()
        .collect();
    todos.sort_by_key(|todo| todo.id);
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut store = db.write().await;
    store.next_id += 1;
    let todo = Todo {
        id: store.next_id,
        user_id: input.user_id,
        title: input.title,
        completed: input.completed,
    };
    store.todos.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

// Successful deletion echoes the removed id so clients can reconcile without
// trusting their own bookkeeping.
async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<i64>, StatusCode> {
    let mut store = db.write().await;
    store
        .todos
        .remove(&id)
        .map(|todo| Json(todo.id))
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_user_id_as_camel_case() {
        let todo = Todo {
            id: 1,
            user_id: 7,
            title: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["userId"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = Todo {
            id: 9,
            user_id: 7,
            title: "Roundtrip".to_string(),
            completed: true,
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, todo.id);
        assert_eq!(back.user_id, todo.user_id);
        assert_eq!(back.title, todo.title);
        assert_eq!(back.completed, todo.completed);
    }

    #[test]
    fn create_todo_defaults_completed_to_false() {
        let input: CreateTodo =
            serde_json::from_str(r#"{"userId":7,"title":"No completed field"}"#).unwrap();
        assert_eq!(input.title, "No completed field");
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"userId":7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_rejects_missing_user() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"title":"Orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_todo_partial_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":"New title"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("New title"));
        assert!(input.completed.is_none());
    }
}
