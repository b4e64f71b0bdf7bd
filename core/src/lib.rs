//! Client core for a remote todo list with optimistic updates.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless — it holds only `base_url`. Each store
//!   primitive is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `TodoListController` layers optimistic state on top: placeholder rows
//!   for unacknowledged creates, per-record pending marks, a busy flag for
//!   the input field, and a single-slot error banner with a fixed
//!   visibility window.
//! - Time is a parameter (`Instant` arguments), never an ambient clock read,
//!   so expiry behavior tests exactly.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod banner;
pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod types;

pub use banner::{ErrorBanner, ERROR_VISIBLE_FOR};
pub use client::TodoClient;
pub use controller::{Effects, HttpCall, OpId, TodoEntry, TodoListController, TodoView, ViewState};
pub use error::{ApiError, UiError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use types::{EntryId, Filter, NewTodo, Todo, TodoPatch};
