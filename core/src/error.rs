//! Error types for the client core.
//!
//! # Design
//! `ApiError` covers everything that can go wrong between building a request
//! and getting a parsed value back: transport failures reported by the host,
//! unexpected statuses, and malformed bodies. `NotFound` gets a dedicated
//! variant because callers frequently distinguish "the resource does not
//! exist" from "the server returned an unexpected status."
//!
//! `UiError` is a separate, deliberately tiny vocabulary: the fixed
//! user-facing messages the controller surfaces in its error banner. Every
//! `ApiError` collapses into one of them depending on which operation failed;
//! the underlying detail goes to the log, never to the user.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `TodoClient` parse methods and request execution.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 — the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialize(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The host could not complete the request at all.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The fixed user-facing failure messages.
///
/// `Display` is the exact banner text; nothing about the underlying failure
/// leaks into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("Title should not be empty")]
    EmptyTitle,
    #[error("Unable to load todos")]
    LoadFailed,
    #[error("Unable to add a todo")]
    AddFailed,
    #[error("Unable to update a todo")]
    UpdateFailed,
    #[error("Unable to delete a todo")]
    DeleteFailed,
}
