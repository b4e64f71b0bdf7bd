//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the caller (host) is responsible for executing
//! the actual I/O. This keeps the core deterministic and easy to test: a unit
//! test plays the host by handing back canned responses.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved across
//! threads or queues without lifetime concerns.

use thiserror::Error;

/// HTTP method for a request.
///
/// Exactly the methods the four store primitives use: list (`GET`),
/// create (`POST`), partial update (`PATCH`), delete (`DELETE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `TodoClient::build_*` methods. The caller is responsible for
/// executing this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// back into the core for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Failure reported by the host when a request could not complete at all
/// (connection refused, DNS failure, timeout).
///
/// HTTP error statuses are not transport errors; they come back as ordinary
/// `HttpResponse` values and are interpreted by the parse layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);
