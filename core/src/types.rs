//! Domain types: wire DTOs and local identity.
//!
//! # Design
//! The wire types mirror the remote store's schema but are defined
//! independently; integration tests catch any drift between the two crates.
//! The store keys records by user, so `userId` travels in the list query and
//! in every create payload. Field names on the wire are camelCase.
//!
//! `EntryId` is the one local addition: records created optimistically need
//! an identity before the server has assigned one, and that identity must
//! never collide with a real id. A tagged union makes the collision
//! impossible by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo record as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for partially updating an existing todo. Only the fields
/// present in the JSON are applied; omitted fields remain unchanged on the
/// server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Identity of a record in the local collection.
///
/// Server-assigned ids and optimistic placeholder tokens live in separate
/// variants, so a placeholder can never be mistaken for a persisted record
/// or collide with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryId {
    /// A record the server has acknowledged.
    Persisted(i64),
    /// A placeholder awaiting the server's create response.
    Local(Uuid),
}

impl EntryId {
    /// The server-assigned id, if this record has one.
    pub fn persisted(self) -> Option<i64> {
        match self {
            EntryId::Persisted(id) => Some(id),
            EntryId::Local(_) => None,
        }
    }
}

/// Display-side partition of the collection. Selecting a filter changes what
/// is shown, never what is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Whether a record with this completion state is shown.
    pub fn admits(self, completed: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !completed,
            Filter::Completed => completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_serializes_user_id_as_camel_case() {
        let todo = Todo {
            id: 3,
            user_id: 7,
            title: "Buy milk".to_string(),
            completed: false,
        };
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            value,
            json!({"id": 3, "userId": 7, "title": "Buy milk", "completed": false})
        );
    }

    #[test]
    fn new_todo_defaults_completed_to_false() {
        let input: NewTodo =
            serde_json::from_value(json!({"userId": 7, "title": "Walk dog"})).unwrap();
        assert_eq!(input.user_id, 7);
        assert!(!input.completed);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"completed":true}"#
        );
    }

    #[test]
    fn placeholder_ids_never_report_a_server_id() {
        let local = EntryId::Local(Uuid::new_v4());
        assert_eq!(local.persisted(), None);
        assert_eq!(EntryId::Persisted(12).persisted(), Some(12));
    }

    #[test]
    fn filters_partition_by_completion() {
        assert!(Filter::All.admits(true) && Filter::All.admits(false));
        assert!(Filter::Active.admits(false) && !Filter::Active.admits(true));
        assert!(Filter::Completed.admits(true) && !Filter::Completed.admits(false));
    }
}
